//! MARCXML serialization of exported records.
//!
//! Output follows the Library of Congress MARC21 slim schema
//! (<https://www.loc.gov/standards/marcxml/>): `tag`, `ind1`, `ind2` and
//! `code` are XML attributes and the root element carries
//! `xmlns="http://www.loc.gov/MARC21/slim"`. Data fields are written in the
//! order they were emitted.
//!
//! # Examples
//!
//! ```
//! use archmarc::{marcxml, Field, Leader, Record};
//!
//! let mut record = Record::new(Leader::archival());
//! let mut field = Field::new("245".to_string(), '0', '0');
//! field.add_subfield_str('a', "Smith Papers");
//! record.add_field(field);
//!
//! let xml = marcxml::record_to_marcxml(&record).unwrap();
//! assert!(xml.contains(r#"<datafield tag="245" ind1="0" ind2="0">"#));
//! ```

use quick_xml::se::to_string as xml_to_string;
use serde::Serialize;

use crate::error::{ExportError, Result};
use crate::record::Record;

/// The MARCXML namespace URI.
const MARCXML_NS: &str = "http://www.loc.gov/MARC21/slim";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

#[derive(Debug, Serialize)]
#[serde(rename = "record")]
struct MarcxmlRecord<'a> {
    leader: String,
    controlfield: Vec<MarcxmlControlField<'a>>,
    datafield: Vec<MarcxmlDataField<'a>>,
}

#[derive(Debug, Serialize)]
struct MarcxmlControlField<'a> {
    #[serde(rename = "@tag")]
    tag: &'a str,
    #[serde(rename = "$value")]
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct MarcxmlDataField<'a> {
    #[serde(rename = "@tag")]
    tag: &'a str,
    #[serde(rename = "@ind1")]
    ind1: char,
    #[serde(rename = "@ind2")]
    ind2: char,
    subfield: Vec<MarcxmlSubfield<'a>>,
}

#[derive(Debug, Serialize)]
struct MarcxmlSubfield<'a> {
    #[serde(rename = "@code")]
    code: char,
    #[serde(rename = "$value")]
    value: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename = "collection")]
struct MarcxmlCollection<'a> {
    record: Vec<MarcxmlRecord<'a>>,
}

impl<'a> MarcxmlRecord<'a> {
    fn from_record(record: &'a Record) -> Result<Self> {
        let controlfield = record
            .control_fields_iter()
            .map(|(tag, value)| MarcxmlControlField { tag, value })
            .collect();

        let datafield = record
            .fields()
            .map(|field| MarcxmlDataField {
                tag: &field.tag,
                ind1: field.indicator1,
                ind2: field.indicator2,
                subfield: field
                    .subfields()
                    .map(|sf| MarcxmlSubfield {
                        code: sf.code,
                        value: &sf.value,
                    })
                    .collect(),
            })
            .collect();

        Ok(MarcxmlRecord {
            leader: record.leader.to_leader_string()?,
            controlfield,
            datafield,
        })
    }
}

/// Serialize one record as a standalone MARCXML document.
///
/// # Errors
///
/// Returns an error if the leader is malformed or XML serialization fails.
pub fn record_to_marcxml(record: &Record) -> Result<String> {
    let body = xml_to_string(&MarcxmlRecord::from_record(record)?)
        .map_err(|e| ExportError::Serialization(format!("Failed to serialize to MARCXML: {e}")))?;

    let body = body.replacen("<record>", &format!("<record xmlns=\"{MARCXML_NS}\">"), 1);
    Ok(format!("{XML_DECLARATION}{body}"))
}

/// Serialize several records as one `<collection>` document, in the given
/// order.
///
/// # Errors
///
/// Returns an error if any leader is malformed or XML serialization fails.
pub fn records_to_marcxml_collection(records: &[Record]) -> Result<String> {
    let record = records
        .iter()
        .map(MarcxmlRecord::from_record)
        .collect::<Result<Vec<_>>>()?;

    let body = xml_to_string(&MarcxmlCollection { record })
        .map_err(|e| ExportError::Serialization(format!("Failed to serialize to MARCXML: {e}")))?;

    let body = body.replacen(
        "<collection>",
        &format!("<collection xmlns=\"{MARCXML_NS}\">"),
        1,
    );
    Ok(format!("{XML_DECLARATION}{body}"))
}
