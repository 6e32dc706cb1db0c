use eyre::Result;

/// A trait for reading structured records. Modeled after the `Read` trait in the std.
pub trait ReadRecord {
    /// The type of the records that will be read.
    type Record;

    /// Read the next valid record. Returns None once the input is exhausted.
    fn read_record(&mut self) -> Result<Option<Self::Record>>;

    /// Read all remaining records into the provided buffer. Returns the number of records read.
    fn read_to_end(&mut self, into: &mut Vec<Self::Record>) -> Result<usize> {
        let mut total = 0;
        while let Some(record) = self.read_record()? {
            into.push(record);
            total += 1;
        }
        Ok(total)
    }
}
