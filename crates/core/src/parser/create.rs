use super::LineParser;
use crate::command::{CommandPayload, Datatype};
use crate::error::ParseError;

impl<'a> LineParser<'a> {
    /// `CREATE`
    pub(super) fn parse_create_item(&self) -> Result<CommandPayload, ParseError> {
        self.expect_columns("CREATE", 1)?;
        Ok(CommandPayload::CreateItem)
    }

    /// `CREATE_PROPERTY <tab> datatype`
    pub(super) fn parse_create_property(&self) -> Result<CommandPayload, ParseError> {
        self.expect_columns("CREATE_PROPERTY", 2)?;
        let raw = self.fields[1].trim();
        let datatype = Datatype::from_identifier(raw).ok_or_else(|| ParseError::UnknownDatatype {
            datatype: raw.to_owned(),
        })?;
        Ok(CommandPayload::CreateProperty { datatype })
    }
}
