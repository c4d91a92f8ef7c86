use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::{style, StyledContent, Stylize};
use crossterm::tty::IsTty;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tasm_lib::bytecode::Image;
use tasm_lib::{utils, CompileError};

use std::env;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Compiles a tasm source file and prints the opcodes of every function
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    script: PathBuf,

    /// print `<name>: ` in front of every opcode list
    #[arg(short, long)]
    names: bool,

    /// additionally write the compiled functions to this file as an image
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[cfg(feature = "dev")]
    #[arg(short = 't', long)]
    show_tokens: bool,

    #[cfg(feature = "dev")]
    #[arg(short = 'a', long)]
    show_ast: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("TASM_LOG").unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let src = fs::read_to_string(&cli.script)
        .with_context(|| format!("reading {}", cli.script.display()))?;

    #[cfg(feature = "dev")]
    if cli.show_tokens || cli.show_ast {
        return dump(&cli, &src);
    }

    let functions = match tasm_lib::compile(&src) {
        Ok(functions) => functions,
        Err(e) => {
            report(&cli.script, &src, &e);
            std::process::exit(1);
        }
    };

    for f in &functions {
        if cli.names {
            println!("{}: {:?}", f.name, f.opcodes);
        } else {
            println!("{:?}", f.opcodes);
        }
    }

    if let Some(path) = &cli.output {
        let bytes = Image::new(functions)
            .to_bytes()
            .context("encoding the image")?;
        fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote image");
    }
    Ok(())
}

/// prints a compile error together with the line it occurred in
fn report(script: &Path, src: &str, e: &CompileError) {
    let paint = Painter::for_stderr();
    let (line, col) = utils::line_col(src, e.position());
    let gutter = " ".repeat(line.to_string().len());
    let bar = paint.blue("|");
    eprintln!("{}: {}", paint.error("error"), paint.bold(e));
    eprintln!("{}{} {}:{}:{}", gutter, paint.blue("-->"), script.display(), line, col);
    eprintln!("{} {}", gutter, bar);
    eprintln!(
        "{} {} {}",
        paint.blue(line),
        bar,
        utils::line_at(src, e.position())
    );
    eprintln!("{} {} {}{}", gutter, bar, " ".repeat(col - 1), paint.error("^"));
}

/// Styles diagnostics, unless stderr isn't a terminal or `NO_COLOR` is set
struct Painter {
    color: bool,
}

impl Painter {
    fn for_stderr() -> Self {
        Painter {
            color: io::stderr().is_tty() && env::var_os("NO_COLOR").is_none(),
        }
    }

    fn paint(&self, content: StyledContent<String>) -> String {
        if self.color {
            content.to_string()
        } else {
            content.content().clone()
        }
    }

    fn error(&self, text: impl Display) -> String {
        self.paint(style(text.to_string()).red().bold())
    }

    fn bold(&self, text: impl Display) -> String {
        self.paint(style(text.to_string()).bold())
    }

    fn blue(&self, text: impl Display) -> String {
        self.paint(style(text.to_string()).blue())
    }
}

#[cfg(feature = "dev")]
fn dump(cli: &Cli, src: &str) -> Result<()> {
    use tasm_lib::{lexer, parser};

    let tokens = lexer::tokenize(src);
    if cli.show_tokens {
        for token in &tokens {
            println!("{:?}", token);
        }
        return Ok(());
    }
    let ast = parser::parse(&tokens)?;
    println!("{:#?}", ast);
    Ok(())
}
