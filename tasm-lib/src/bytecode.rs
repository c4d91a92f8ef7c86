//! The output of the compiler: one flat opcode list per function, and the
//! image format used to store them.

use serde::{Deserialize, Serialize};

use crate::utils;

/// A function after emission. `opcodes` holds every instruction's opcode,
/// each directly followed by its operands.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CompiledFunction {
    pub name: String,
    pub opcodes: Vec<i64>,
}

/// the header of an image
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ImageHeader {
    /// version of the crate that compiled the functions
    pub version: [u16; 3],
}

/// All compiled functions of one source file, in declaration order.
/// The functions stay independent, nothing is linked.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Image {
    pub header: ImageHeader,
    pub functions: Vec<CompiledFunction>,
}

impl Image {
    pub fn new(functions: Vec<CompiledFunction>) -> Self {
        Image {
            header: ImageHeader {
                version: utils::get_version(),
            },
            functions,
        }
    }

    pub fn to_bytes(&self) -> postcard::Result<Vec<u8>> {
        postcard::to_allocvec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> postcard::Result<Self> {
        postcard::from_bytes(bytes)
    }

    /// finds the first function with the given name
    pub fn function(&self, name: &str) -> Option<&CompiledFunction> {
        self.functions.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_bytes() {
        let image = Image::new(vec![
            CompiledFunction {
                name: "main".into(),
                opcodes: vec![1, 5, 8, -101, 7],
            },
            CompiledFunction {
                name: "main".into(),
                opcodes: vec![],
            },
        ]);
        let bytes = image.to_bytes().unwrap();
        let decoded = Image::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, image);
        assert_eq!(decoded.function("main").unwrap().opcodes, vec![1, 5, 8, -101, 7]);
        assert!(decoded.function("other").is_none());
    }

    #[test]
    fn test_truncated_image() {
        let image = Image::new(vec![CompiledFunction {
            name: "f".into(),
            opcodes: vec![1, 300],
        }]);
        let bytes = image.to_bytes().unwrap();
        assert!(Image::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }
}
