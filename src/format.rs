//! The `--custom` output format mini-language.
//!
//! A format string consists of a single ASCII delimiter character followed
//! by one field code per requested column, e.g. `,ta` prints title and
//! app-id separated by commas. The string is validated in full before a
//! connection to the compositor is opened.

use crate::error::FormatError;

/// A printable attribute of a toplevel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Title,
    AppId,
    Identifier,
    Activated,
    Fullscreen,
    Minimized,
    Maximized,
}

impl Field {
    /// Map a custom-format field code to its field.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            't' => Some(Field::Title),
            'a' => Some(Field::AppId),
            'i' => Some(Field::Identifier),
            'A' => Some(Field::Activated),
            'f' => Some(Field::Fullscreen),
            'm' => Some(Field::Minimized),
            'M' => Some(Field::Maximized),
            _ => None,
        }
    }
}

/// A parsed `--custom` format: delimiter plus requested fields in order.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomFormat {
    pub delimiter: char,
    pub fields: Vec<Field>,
}

impl CustomFormat {
    /// Parse and validate a format string.
    pub fn parse(spec: &str) -> Result<Self, FormatError> {
        let mut chars = spec.chars();
        let delimiter = chars.next().ok_or(FormatError::Empty)?;
        if !delimiter.is_ascii() {
            return Err(FormatError::NonAsciiDelimiter(delimiter));
        }

        let fields = chars
            .map(|code| Field::from_code(code).ok_or(FormatError::UnknownField(code)))
            .collect::<Result<Vec<_>, _>>()?;
        if fields.is_empty() {
            return Err(FormatError::NoFields);
        }

        Ok(Self { delimiter, fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_activated_app_id() {
        let format = CustomFormat::parse(",Aa").unwrap();
        assert_eq!(format.delimiter, ',');
        assert_eq!(format.fields, vec![Field::Activated, Field::AppId]);
    }

    #[test]
    fn test_parse_all_codes() {
        let format = CustomFormat::parse("|taiAfmM").unwrap();
        assert_eq!(format.delimiter, '|');
        assert_eq!(
            format.fields,
            vec![
                Field::Title,
                Field::AppId,
                Field::Identifier,
                Field::Activated,
                Field::Fullscreen,
                Field::Minimized,
                Field::Maximized,
            ]
        );
    }

    #[test]
    fn test_delimiter_may_be_a_field_code_letter() {
        // The first character is always the delimiter, even if it looks
        // like a field code.
        let format = CustomFormat::parse("tt").unwrap();
        assert_eq!(format.delimiter, 't');
        assert_eq!(format.fields, vec![Field::Title]);
    }

    #[test]
    fn test_empty_format_is_rejected() {
        assert_eq!(CustomFormat::parse(""), Err(FormatError::Empty));
    }

    #[test]
    fn test_delimiter_without_fields_is_rejected() {
        assert_eq!(CustomFormat::parse("|"), Err(FormatError::NoFields));
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        assert_eq!(
            CustomFormat::parse("→ta"),
            Err(FormatError::NonAsciiDelimiter('→'))
        );
    }

    #[test]
    fn test_unknown_field_code_is_rejected() {
        assert_eq!(
            CustomFormat::parse(",tx"),
            Err(FormatError::UnknownField('x'))
        );
    }
}
