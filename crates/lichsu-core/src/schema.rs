//! Canonical output schema and run configuration

use std::path::PathBuf;

/// Date format used by the source records (day/month/year)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Header of the placeholder sheet written when a symbol has no valid data
pub const PLACEHOLDER_HEADER: &str = "Thong bao";

/// Message row of the placeholder sheet
pub const PLACEHOLDER_MESSAGE: &str = "Khong co du lieu hop le";

/// The 30 HNX-INDEX symbols eligible for processing, in processing order
pub const HNX_SYMBOLS: [&str; 30] = [
    "DVM", "DP3", "CAP", "DTD", "CEO", "BVS", "DHT", "DXP", "HGM", "HUT",
    "IDC", "L18", "L14", "IDV", "LAS", "LHC", "MBS", "NTP", "PSD", "PLC",
    "PVB", "PVI", "PVC", "PVS", "SHS", "SLS", "TMB", "TNG", "VC3", "VCS",
];

/// How a canonical field's value is produced from a flattened record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Calendar date parsed under [`DATE_FORMAT`]
    Date,
    /// Plain numeric value; numeric strings tolerated, thousands commas stripped
    Number,
    /// First signed decimal in a compound change text
    ChangeValue,
    /// First signed decimal following an opening parenthesis in that text
    ChangePercent,
}

/// One canonical output column: source field name, output header, value kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key in the flattened record (or a plain input column name)
    pub source: &'static str,
    /// Canonical output header
    pub header: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(source: &'static str, header: &'static str, kind: FieldKind) -> Self {
        Self {
            source,
            header,
            kind,
        }
    }
}

/// The ordered canonical field list.
///
/// Output headers follow this order regardless of input ordering; only fields
/// actually observed in a sheet appear in its output. Two entries target
/// `Change_Pct`: the pair derived from the compound change text and the
/// directly-reported percent field. The first one observed wins, so the
/// derived value takes precedence whenever the compound text is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub fields: Vec<FieldSpec>,
}

impl Default for Schema {
    fn default() -> Self {
        use FieldKind::*;
        Self {
            fields: vec![
                FieldSpec::new("Ngay", "Date", Date),
                FieldSpec::new("GiaMoCua", "Open", Number),
                FieldSpec::new("GiaCaoNhat", "High", Number),
                FieldSpec::new("GiaThapNhat", "Low", Number),
                FieldSpec::new("GiaDongCua", "Close", Number),
                FieldSpec::new("GiaDieuChinh", "Close_Adj", Number),
                FieldSpec::new("ThayDoi", "Change", ChangeValue),
                FieldSpec::new("ThayDoi", "Change_Pct", ChangePercent),
                FieldSpec::new("PhanTramThayDoi", "Change_Pct", Number),
                FieldSpec::new("KhoiLuongKhopLenh", "Volume", Number),
                FieldSpec::new("GiaTriKhopLenh", "Value", Number),
                FieldSpec::new("KLThoaThuan", "Vol_Agree", Number),
                FieldSpec::new("GtThoaThuan", "Val_Agree", Number),
            ],
        }
    }
}

/// Run configuration: paths, sheet allow-list, and the canonical schema.
///
/// `Default` carries the historical constants; the CLI overrides the paths
/// from its arguments.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Sheet names eligible for processing, in processing order
    pub sheets: Vec<String>,
    pub schema: Schema,
}

impl Config {
    /// Intersect the allow-list with the sheets actually present, keeping
    /// allow-list order. Sheets outside the allow-list are never processed
    /// or reported; allow-listed sheets missing from the file are silently
    /// skipped.
    pub fn targets(&self, present: &[String]) -> Vec<String> {
        self.sheets
            .iter()
            .filter(|name| present.iter().any(|p| &p == name))
            .cloned()
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("HNXINDEX30_STOCKS_Lichsu.xlsx"),
            output_path: PathBuf::from("HNXINDEX30_STOCKS_Lichsu_Clean.xlsx"),
            sheets: HNX_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            schema: Schema::default(),
        }
    }
}
