use super::LineParser;
use crate::command::CommandPayload;
use crate::error::ParseError;
use crate::ids;

impl<'a> LineParser<'a> {
    /// `MERGE <tab> Qa <tab> Qb`
    ///
    /// The lower-numbered item always ends up as `item1`, the merge target.
    pub(super) fn parse_merge(&self) -> Result<CommandPayload, ParseError> {
        self.expect_columns("MERGE", 3)?;
        let mut item1 = self.fields[1].trim();
        let mut item2 = self.fields[2].trim();
        let (n1, n2) = match (ids::numeric_suffix(item1), ids::numeric_suffix(item2)) {
            (Some(n1), Some(n2)) => (n1, n2),
            _ => {
                return Err(ParseError::MergeFormat {
                    item1: item1.to_owned(),
                    item2: item2.to_owned(),
                })
            }
        };
        if n1 > n2 {
            std::mem::swap(&mut item1, &mut item2);
        }
        Ok(CommandPayload::Merge {
            item1: item1.to_owned(),
            item2: item2.to_owned(),
        })
    }
}
