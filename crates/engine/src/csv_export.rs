//! Spreadsheet friendly CSV serialization of movements.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{EngineError, Movement, ResultEngine};

/// UTF-8 byte order mark, so spreadsheet tools pick the right encoding.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";
pub const HEADER: [&str; 5] = ["Concept", "Amount", "Date", "Kind", "Owner"];
pub const DATE_FORMAT: &str = "%d/%m/%Y";

fn csv_error(err: impl std::fmt::Display) -> EngineError {
    EngineError::InvalidInput(format!("csv serialization failed: {err}"))
}

/// Serializes `movements` in the given order.
///
/// Fields holding a comma, quote or line break are quoted with inner quotes
/// doubled. Records end with CRLF.
pub fn to_csv(movements: &[Movement]) -> ResultEngine<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(BOM.to_vec());

    writer.write_record(HEADER).map_err(csv_error)?;
    for movement in movements {
        let date = movement.occurred_at.format(DATE_FORMAT).to_string();
        writer
            .write_record([
                movement.concept.as_str(),
                movement.amount.raw_decimal().as_str(),
                date.as_str(),
                movement.kind.as_str(),
                movement.owner_name.as_str(),
            ])
            .map_err(csv_error)?;
    }

    writer.into_inner().map_err(|err| csv_error(err.error()))
}
