use ftt_core::errors::{ErrorInfo, FttError};
use ftt_core::{DescendantSummary, EventRecord};
use serde::{Deserialize, Serialize};

use crate::schema::TableSchema;

/// JSON rendering of a finalized table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDocument {
    /// Tree name, title, version and columns.
    pub schema: TableSchema,
    /// Number of rows.
    pub entries: u64,
    /// SHA-256 of the canonical encoding of `rows`.
    pub digest: String,
    /// Rows in append order.
    pub rows: Vec<EventRecord>,
}

fn serde_error(code: &str, err: impl ToString) -> FttError {
    FttError::Serde(ErrorInfo::new(code, err.to_string()))
}

pub(crate) fn render_json(document: &TableDocument) -> Result<Vec<u8>, FttError> {
    let mut bytes =
        serde_json::to_vec_pretty(document).map_err(|err| serde_error("table-json", err))?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub(crate) fn render_csv(schema: &TableSchema, rows: &[EventRecord]) -> Result<Vec<u8>, FttError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(schema.column_names())
        .map_err(|err| serde_error("table-csv", err))?;
    let with_descendants = schema.has_descendants();
    for row in rows {
        let mut fields = vec![
            row.event_number.to_string(),
            join_values(&row.decay_radius),
            join_values(&row.lifetime),
            join_values(&row.pt),
        ];
        if with_descendants {
            fields.push(join_descendants(row.descendants.as_deref().unwrap_or_default()));
        }
        writer
            .write_record(&fields)
            .map_err(|err| serde_error("table-csv", err))?;
    }
    writer
        .into_inner()
        .map_err(|err| serde_error("table-csv", err))
}

/// Sequence cell: values separated by `;`.
fn join_values(values: &[f32]) -> String {
    values
        .iter()
        .map(f32::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

/// Descendant cell: primaries separated by `;`, descendants by a space,
/// fields as `pdg_id:barcode:mass:pt`.
fn join_descendants(lists: &[Vec<DescendantSummary>]) -> String {
    lists
        .iter()
        .map(|list| {
            list.iter()
                .map(|child| {
                    format!("{}:{}:{}:{}", child.pdg_id, child.barcode, child.mass, child.pt)
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_cells_join_sequences() {
        let mut row = EventRecord::new(42);
        row.decay_radius = vec![1.5, 0.0];
        row.lifetime = vec![0.25];
        row.pt = vec![2.0, 3.5];
        row.descendants = Some(vec![
            vec![DescendantSummary {
                pdg_id: -13,
                barcode: 7,
                mass: 0.1,
                pt: 12.0,
            }],
            Vec::new(),
        ]);
        let schema = TableSchema::truth_tuple("t", "T", true);
        let text = String::from_utf8(render_csv(&schema, &[row]).unwrap()).unwrap();
        assert_eq!(
            text,
            "EventNumber,DV_R,n1_lifetime,n1pt,n1_children\n42,1.5;0,0.25,2;3.5,-13:7:0.1:12;\n"
        );
    }

    #[test]
    fn empty_sequences_give_empty_cells() {
        let text =
            String::from_utf8(render_csv(&TableSchema::default(), &[EventRecord::new(3)]).unwrap())
                .unwrap();
        assert_eq!(text.lines().nth(1), Some("3,,,"));
    }
}
