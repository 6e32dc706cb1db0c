#[cfg(feature = "bitcode")]
use bitcode::{Decode, Encode};
use derive_getters::{Dissolve, Getters};

/// Layout of a delimited text file: field delimiter, number of header lines to skip and the
/// prefix of comment lines.
#[cfg_attr(feature = "bitcode", derive(Encode, Decode))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Dissolve, Getters)]
pub struct Dialect {
    delimiter: char,
    header_lines: usize,
    comment: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            header_lines: 0,
            comment: '#',
        }
    }
}

impl Dialect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_delimiter(&mut self, delimiter: char) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    pub fn set_header_lines(&mut self, header_lines: usize) -> &mut Self {
        self.header_lines = header_lines;
        self
    }

    pub fn set_comment(&mut self, comment: char) -> &mut Self {
        self.comment = comment;
        self
    }
}
