//! Three-sheet cluster report and its XLSX serialization

use crate::data::{CellValue, Dataset};
use crate::error::{ClusterError, Result};
use crate::keywords::Keyword;
use rust_xlsxwriter::{
    Chart, ChartType, DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook,
    Worksheet,
};

pub const CLUSTERS_SHEET: &str = "Clusters";
pub const KEYWORDS_SHEET: &str = "Top_Keywords";
pub const SUMMARY_SHEET: &str = "Cluster_Report";
pub const CLUSTER_COLUMN: &str = "cluster_num";

/// Section A: the input rows decorated with their cluster id
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedData {
    /// Original column names, with `cluster_num` appended unless already present
    pub columns: Vec<String>,
    /// Index of the free-text column
    pub text_column: usize,
    /// Index of the `cluster_num` column
    pub cluster_column: usize,
    /// Original cells with the cluster id in `cluster_column`, in input order
    pub rows: Vec<Vec<CellValue>>,
}

/// Section B: ranked keywords per cluster
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTable {
    /// Number of rank columns
    pub top_n: usize,
    /// One list per cluster id; may be shorter than `top_n`
    pub keywords: Vec<Vec<String>>,
}

/// Section C: documents per cluster id
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    pub counts: Vec<usize>,
}

/// The finished report
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub annotated: AnnotatedData,
    pub keywords: KeywordTable,
    pub summary: ClusterSummary,
}

/// Assemble the report from the decorated dataset
///
/// # Arguments
/// * `dataset` - Input rows
/// * `labels` - Cluster id per row
/// * `keywords` - Ranked keywords, one list per cluster id
/// * `counts` - Documents per cluster id
/// * `top_n` - Rank columns in the keyword sheet
pub fn build_report(
    dataset: &Dataset,
    labels: &[usize],
    keywords: &[Vec<Keyword>],
    counts: &[usize],
    top_n: usize,
) -> Result<Report> {
    if labels.len() != dataset.len() {
        return Err(assembly_error(format!(
            "{} cluster labels for {} documents",
            labels.len(),
            dataset.len()
        )));
    }
    if keywords.len() != counts.len() {
        return Err(assembly_error(format!(
            "{} keyword lists for {} clusters",
            keywords.len(),
            counts.len()
        )));
    }
    if let Some(&label) = labels.iter().find(|&&l| l >= counts.len()) {
        return Err(assembly_error(format!(
            "cluster id {} outside 0..{}",
            label,
            counts.len()
        )));
    }

    // an existing cluster_num column is overwritten in place
    let mut columns = dataset.columns.clone();
    let cluster_column = match columns.iter().position(|c| c == CLUSTER_COLUMN) {
        Some(idx) => idx,
        None => {
            columns.push(CLUSTER_COLUMN.to_string());
            columns.len() - 1
        }
    };

    let rows = dataset
        .documents
        .iter()
        .zip(labels)
        .map(|(doc, &label)| {
            let mut row = doc.cells.clone();
            let id = CellValue::Number(label as f64);
            match row.get_mut(cluster_column) {
                Some(cell) => *cell = id,
                None => row.push(id),
            }
            row
        })
        .collect();

    let keywords = keywords
        .iter()
        .map(|list| list.iter().take(top_n).map(|k| k.term.clone()).collect())
        .collect();

    Ok(Report {
        annotated: AnnotatedData {
            columns,
            text_column: dataset.text_column,
            cluster_column,
            rows,
        },
        keywords: KeywordTable { top_n, keywords },
        summary: ClusterSummary {
            counts: counts.to_vec(),
        },
    })
}

fn assembly_error(message: String) -> ClusterError {
    ClusterError::Packaging {
        stage: "report assembly",
        message,
    }
}

impl Report {
    pub fn n_clusters(&self) -> usize {
        self.summary.counts.len()
    }

    /// Serialize the report as an XLSX workbook.
    ///
    /// Document properties carry a fixed creation date so identical reports
    /// serialize to identical bytes.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
        workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

        workbook.push_worksheet(self.clusters_sheet()?);
        workbook.push_worksheet(self.keywords_sheet()?);
        workbook.push_worksheet(self.summary_sheet()?);

        let bytes = workbook.save_to_buffer()?;
        tracing::debug!(bytes = bytes.len(), "serialized workbook");
        Ok(bytes)
    }

    fn clusters_sheet(&self) -> Result<Worksheet> {
        let data = &self.annotated;
        let header = Format::new().set_bold().set_border(FormatBorder::Thin);
        let wrap = Format::new().set_text_wrap();

        let mut sheet = Worksheet::new();
        sheet.set_name(CLUSTERS_SHEET)?;

        for (col, name) in data.columns.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, name, &header)?;
        }

        for (r, row) in data.rows.iter().enumerate() {
            let r = r as u32 + 1;
            for (c, cell) in row.iter().enumerate() {
                let c16 = c as u16;
                match cell {
                    CellValue::Text(s) if c == data.text_column => {
                        sheet.write_string_with_format(r, c16, s, &wrap)?;
                    }
                    CellValue::Text(s) => {
                        sheet.write_string(r, c16, s)?;
                    }
                    CellValue::Number(n) => {
                        sheet.write_number(r, c16, *n)?;
                    }
                    CellValue::Bool(b) => {
                        sheet.write_boolean(r, c16, *b)?;
                    }
                }
            }
        }

        sheet.set_column_width(data.text_column as u16, 50)?;
        sheet.set_column_width(data.cluster_column as u16, 12.5)?;
        Ok(sheet)
    }

    fn keywords_sheet(&self) -> Result<Worksheet> {
        let table = &self.keywords;
        let top_n = table.top_n as u16;
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);
        let border = Format::new().set_border(FormatBorder::Thin);

        let mut sheet = Worksheet::new();
        sheet.set_name(KEYWORDS_SHEET)?;

        sheet.merge_range(0, 0, 1, 0, CLUSTER_COLUMN, &header)?;
        if top_n > 1 {
            sheet.merge_range(0, 1, 0, top_n, "top_keyword", &header)?;
        } else {
            sheet.write_string_with_format(0, 1, "top_keyword", &header)?;
        }
        for rank in 1..=top_n {
            sheet.write_number_with_format(1, rank, rank, &border)?;
        }

        for (cluster, terms) in table.keywords.iter().enumerate() {
            let row = cluster as u32 + 2;
            sheet.write_number_with_format(row, 0, cluster as f64, &border)?;
            for rank in 0..top_n {
                match terms.get(rank as usize) {
                    Some(term) => sheet.write_string_with_format(row, rank + 1, term, &border)?,
                    None => sheet.write_blank(row, rank + 1, &border)?,
                };
            }
        }

        sheet.set_column_width(0, 12.5)?;
        Ok(sheet)
    }

    fn summary_sheet(&self) -> Result<Worksheet> {
        let header = Format::new().set_bold().set_border(FormatBorder::Thin);
        let k = self.n_clusters() as u32;

        let mut sheet = Worksheet::new();
        sheet.set_name(SUMMARY_SHEET)?;

        sheet.write_string_with_format(0, 0, CLUSTER_COLUMN, &header)?;
        sheet.write_string_with_format(0, 1, "num_documents", &header)?;
        for (cluster, &count) in self.summary.counts.iter().enumerate() {
            let row = cluster as u32 + 1;
            sheet.write_number(row, 0, cluster as f64)?;
            sheet.write_number(row, 1, count as f64)?;
        }

        let mut chart = Chart::new(ChartType::Column);
        chart
            .add_series()
            .set_categories((SUMMARY_SHEET, 1, 0, k, 0))
            .set_values((SUMMARY_SHEET, 1, 1, k, 1));
        chart.legend().set_hidden();
        chart.x_axis().set_name(CLUSTER_COLUMN);
        chart.y_axis().set_name("# Documents");
        sheet.insert_chart(1, 3, &chart)?;

        sheet.set_column_width(0, 12.5)?;
        sheet.set_column_width(1, 17)?;
        Ok(sheet)
    }
}
