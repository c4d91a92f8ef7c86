//! Runs the tasm binary against the scripts in `tests/`.
//!
//! * `tests/<name>.tasm` must compile, and its stdout must equal `tests/<name>.out`.
//!   If `tests/<name>.args` exists, its whitespace separated words are passed to
//!   tasm in front of the script.
//! * `tests/fail/<name>.tasm` must be rejected with a non-zero exit status,
//!   nothing on stdout, and the diagnostic in `tests/fail/<name>.err` on stderr.
//! * `tests/functions.tasm` is also compiled with `--output`, and the written
//!   image is read back.
//!
//! tasm is run from this crate's directory with script paths relative to it,
//! so the paths in the `.err` files are stable.

use anyhow::{anyhow, bail, Context, Result};
use glob::glob;
use tasm_lib::bytecode::Image;
use std::result::Result as StdResult;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
}

fn tasm_binary() -> PathBuf {
    root().join("../target/release/tasm")
}

fn main() -> Result<()> {
    compile_tasm().context("compiling tasm")?;

    let mut failures = 0;
    for script in scripts("tests/*.tasm")? {
        let expected_output = read_expected(&script, "out")?;
        let args = match fs::read_to_string(root().join(script.with_extension("args"))) {
            Ok(args) => args.split_whitespace().map(str::to_owned).collect(),
            Err(_) => vec![],
        };
        let output = run(&args, &script)?;
        let stdout = String::from_utf8(output.stdout)?;
        if output.status.success() && stdout == expected_output {
            println!("{}: passed", script.display());
        } else {
            failures += 1;
            println!(
                "{}: failed\nactual output:\n{}{}",
                script.display(),
                stdout,
                String::from_utf8_lossy(&output.stderr)
            );
        }
    }

    for script in scripts("tests/fail/*.tasm")? {
        let expected_err = read_expected(&script, "err")?;
        let output = run(&[], &script)?;
        let stderr = String::from_utf8(output.stderr)?;
        if output.status.success() || !output.stdout.is_empty() {
            failures += 1;
            println!("{}: failed, the script was accepted", script.display());
        } else if stderr != expected_err {
            failures += 1;
            println!("{}: failed\nactual diagnostic:\n{}", script.display(), stderr);
        } else {
            println!("{}: passed", script.display());
        }
    }

    match check_image() {
        Ok(()) => println!("image output: passed"),
        Err(e) => {
            failures += 1;
            println!("image output: failed\n{:#}", e);
        }
    }

    if failures > 0 {
        bail!("{} check(s) failed", failures);
    }
    Ok(())
}

/// the scripts matching `pattern`, relative to this crate's directory
fn scripts(pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = root().join(pattern);
    let full_pattern = full_pattern
        .to_str()
        .ok_or_else(|| anyhow!("non utf-8 path: {}", full_pattern.display()))?;
    let found: Vec<PathBuf> = glob(full_pattern)?.collect::<StdResult<_, _>>()?;
    if found.is_empty() {
        bail!("no scripts match {}", pattern);
    }
    found
        .into_iter()
        .map(|p| -> Result<PathBuf> { Ok(p.strip_prefix(root())?.to_path_buf()) })
        .collect()
}

fn read_expected(script: &Path, extension: &str) -> Result<String> {
    let path = root().join(script.with_extension(extension));
    fs::read_to_string(&path).context(format!("loading expected output: {}", path.display()))
}

fn run(args: &[String], script: &Path) -> Result<Output> {
    Command::new(tasm_binary())
        .args(args)
        .arg(script)
        .current_dir(root())
        .env("NO_COLOR", "1")
        .env_remove("TASM_LOG")
        .output()
        .context(format!("running script {}", script.display()))
}

fn check_image() -> Result<()> {
    let image_path = root().join("../target/test-suite/functions.img");
    fs::create_dir_all(image_path.parent().unwrap_or(root()))?;
    let output = run(
        &["--output".into(), image_path.display().to_string()],
        Path::new("tests/functions.tasm"),
    )?;
    if !output.status.success() {
        bail!("tasm failed: {}", String::from_utf8_lossy(&output.stderr));
    }

    let image = Image::from_bytes(&fs::read(&image_path)?)?;
    let names: Vec<_> = image.functions.iter().map(|f| f.name.as_str()).collect();
    if names != ["main", "gui", "main"] {
        bail!("unexpected functions in the image: {:?}", names);
    }
    let gui = image
        .function("gui")
        .ok_or_else(|| anyhow!("the image has no function `gui`"))?;
    if gui.opcodes != [8, -205, 8, -209, 8, -210] {
        bail!("unexpected opcodes for `gui`: {:?}", gui.opcodes);
    }
    // the first of two functions with the same name wins
    let main = image
        .function("main")
        .ok_or_else(|| anyhow!("the image has no function `main`"))?;
    if main.opcodes != [1, 3, 8, -106, 2, 0, 3, 1] {
        bail!("unexpected opcodes for `main`: {:?}", main.opcodes);
    }
    Ok(())
}

fn compile_tasm() -> Result<()> {
    let st = Command::new("cargo")
        .args(["build", "--release", "-p", "tasm"])
        .current_dir(root().join(".."))
        .status()?;
    if st.success() {
        Ok(())
    } else {
        Err(anyhow!("compiling tasm failed"))
    }
}
