//! Audit sinks that record finished transfers, and a reader for recorded trails

use std::io::{Read, Stdout, Write};

use csv::Trim;

use crate::{
    errors::Error,
    types::{TransferLog, TransferProcessor, TransferRecord},
};

/// Writes each transfer as three human-readable lines.
///
/// A transfer of 150 from account 1 to account 2 looks like:
/// ```text
/// 1 send to 2 $150
/// Balance 1 is 49
/// Balance 2 is 400
/// ```
#[derive(Debug)]
pub struct TextTransferLog<W> {
    writer: W,
}

impl<W: Write> TextTransferLog<W> {
    /// Creates a log writing to `writer`
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the log, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl TextTransferLog<Stdout> {
    /// Creates a log writing to standard output
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TransferLog for TextTransferLog<W> {
    fn record(&mut self, record: &TransferRecord) -> Result<(), Error> {
        writeln!(
            self.writer,
            "{} send to {} ${}",
            record.from, record.to, record.amount
        )?;
        writeln!(self.writer, "Balance {} is {}", record.from, record.from_balance)?;
        writeln!(self.writer, "Balance {} is {}", record.to, record.to_balance)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl Default for TransferProcessor<TextTransferLog<Stdout>> {
    /// A processor with the default fee that prints each transfer to standard output
    fn default() -> Self {
        TransferProcessor::new(TextTransferLog::stdout())
    }
}

/// Writes each transfer as a CSV row.
///
/// Output data will be in the form:
/// ```csv
/// from,to,amount,from_balance,to_balance,outcome
/// 1,2,300,699,2300,completed
/// 1,2,300,100,200,declined
/// ```
pub struct CsvTransferLog<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvTransferLog<W> {
    /// Creates a log writing to `writer`. The header is written with the first record.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    /// Flushes and consumes the log, returning the underlying writer
    /// # Errors
    /// [`Error::Io`] if buffered rows couldn't be flushed
    pub fn into_inner(self) -> Result<W, Error> {
        self.writer
            .into_inner()
            .map_err(|err| Error::Io(err.into_error()))
    }
}

impl<W: Write> TransferLog for CsvTransferLog<W> {
    fn record(&mut self, record: &TransferRecord) -> Result<(), Error> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Loads a trail written by [`CsvTransferLog`].
///
/// Whitespace around fields is ignored.
/// # Errors
/// [`Error::Csv`] if a row can't be read or parsed
pub fn read_transfer_records<R: Read>(reader: R) -> Result<Vec<TransferRecord>, Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for record in csv_reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::types::{Account, AccountId, TransferOutcome};

    use super::*;

    #[test]
    fn test_text_format() {
        let mut processor = TransferProcessor::new(TextTransferLog::new(Vec::new()));
        let mut from = Account::new(1.into(), 200);
        let mut to = Account::new(2.into(), 250);
        assert!(processor.transfer(&mut from, &mut to, 150).unwrap().is_completed());
        let output = String::from_utf8(processor.into_log().into_inner()).unwrap();
        assert_eq!(output, "1 send to 2 $150\nBalance 1 is 49\nBalance 2 is 400\n");
    }

    #[test]
    fn test_text_format_after_rollback() {
        let mut processor = TransferProcessor::new(TextTransferLog::new(Vec::new()));
        let mut from = Account::new(1.into(), 100);
        let mut to = Account::new(2.into(), 200);
        assert!(!processor.transfer(&mut from, &mut to, 300).unwrap().is_completed());
        let output = String::from_utf8(processor.into_log().into_inner()).unwrap();
        assert_eq!(output, "1 send to 2 $300\nBalance 1 is 100\nBalance 2 is 200\n");
    }

    #[test]
    fn test_default_processor() {
        let processor = TransferProcessor::<TextTransferLog<Stdout>>::default();
        assert_eq!(processor.fee(), 1);
        assert_eq!(processor.config().minimum_amount, 100);
    }

    #[test]
    fn test_csv_trail() {
        let mut processor = TransferProcessor::new(CsvTransferLog::new(Vec::new()));
        let mut first = Account::new(1.into(), 1000);
        let mut second = Account::new(2.into(), 2000);
        processor.transfer(&mut first, &mut second, 300).unwrap();
        processor.transfer(&mut second, &mut first, 5000).unwrap();
        let output = processor.into_log().into_inner().unwrap();
        assert_eq!(
            String::from_utf8(output.clone()).unwrap(),
            "from,to,amount,from_balance,to_balance,outcome\n\
             1,2,300,699,2300,completed\n\
             2,1,5000,2300,699,declined\n"
        );
        let records = read_transfer_records(Cursor::new(output)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].from, AccountId::from(2));
        assert_eq!(records[1].outcome, TransferOutcome::Declined);
    }

    #[test]
    fn test_read_with_whitespace() {
        let input = b"from, to, amount, from_balance, to_balance, outcome
1,   2,   150,    49,  400, completed
";
        let records = read_transfer_records(Cursor::new(&input[..])).unwrap();
        assert_eq!(
            records,
            vec![TransferRecord {
                from: 1.into(),
                to: 2.into(),
                amount: 150,
                from_balance: 49,
                to_balance: 400,
                outcome: TransferOutcome::Completed,
            }]
        );
    }

    #[test]
    fn test_read_rejects_bad_outcome() {
        let input = b"from,to,amount,from_balance,to_balance,outcome\n1,2,150,49,400,maybe\n";
        assert!(matches!(
            read_transfer_records(Cursor::new(&input[..])),
            Err(Error::Csv(_))
        ));
    }
}
