// ==========================================
// TB CareMap - 字段映射器实现
// ==========================================
// 职责: 原始行 (数仓大写列名) → 领域记录 + 类型转换
// 必需列缺失或为空 → MissingField
// 可选列 (INCENTIVE_SCHEME / LATITUDE / LONGITUDE) 缺失 → None
// ==========================================

use crate::common::parse_date_best_effort;
use crate::domain::inventory::InventoryObservation;
use crate::domain::network::{CascadeRecord, DepotRecord, ProviderRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::NaiveDate;

pub struct FieldMapper;

impl FieldMapper {
    // ==========================================
    // 行级映射
    // ==========================================

    pub fn map_inventory(&self, row: &RawRow, row_number: usize) -> ImportResult<InventoryObservation> {
        Ok(InventoryObservation {
            location: self.require_string(row, "LOCATION", row_number)?,
            item: self.require_string(row, "ITEM", row_number)?,
            date: self.require_date(row, "DATE", row_number)?,
            closing_stock: self.require_f64(row, "CLOSING_STOCK", row_number)?,
            tb_cases_active: self.require_i64(row, "TB_CASES_ACTIVE", row_number)?,
            lead_time_days: self.require_f64(row, "LEAD_TIME_DAYS", row_number)?,
            tb_risk_score: self.require_f64(row, "TB_RISK_SCORE", row_number)?,
        })
    }

    pub fn map_cascade(&self, row: &RawRow, row_number: usize) -> ImportResult<CascadeRecord> {
        Ok(CascadeRecord {
            location: self.require_string(row, "LOCATION", row_number)?,
            median_patient_delay_days: self.require_f64(
                row,
                "MEDIAN_PATIENT_DELAY_DAYS",
                row_number,
            )?,
            median_diagnostic_delay_days: self.require_f64(
                row,
                "MEDIAN_DIAGNOSTIC_DELAY_DAYS",
                row_number,
            )?,
            median_treatment_delay_days: self.require_f64(
                row,
                "MEDIAN_TREATMENT_DELAY_DAYS",
                row_number,
            )?,
        })
    }

    pub fn map_provider(&self, row: &RawRow, row_number: usize) -> ImportResult<ProviderRecord> {
        Ok(ProviderRecord {
            facility_id: self.require_string(row, "FACILITY_ID", row_number)?,
            facility_name: self.require_string(row, "FACILITY_NAME", row_number)?,
            location: self.require_string(row, "LOCATION", row_number)?,
            doctor_count: self.require_i64(row, "DOCTOR_COUNT", row_number)?,
            incentive_scheme: self.get_string(row, "INCENTIVE_SCHEME"),
        })
    }

    pub fn map_depot(&self, row: &RawRow, row_number: usize) -> ImportResult<DepotRecord> {
        Ok(DepotRecord {
            depot_id: self.require_string(row, "DEPOT_ID", row_number)?,
            depot_name: self.require_string(row, "DEPOT_NAME", row_number)?,
            location: self.require_string(row, "LOCATION", row_number)?,
            region: self.require_string(row, "REGION", row_number)?,
            stock_level: self.require_f64(row, "STOCK_LEVEL", row_number)?,
            latitude: self.parse_f64(row, "LATITUDE", row_number)?,
            longitude: self.parse_f64(row, "LONGITUDE", row_number)?,
        })
    }

    // ==========================================
    // 批量映射
    // ==========================================
    // 行号按文件行计 (表头占第 1 行)

    pub fn map_all<T>(
        &self,
        rows: &[RawRow],
        map_row: impl Fn(&Self, &RawRow, usize) -> ImportResult<T>,
    ) -> ImportResult<Vec<T>> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| map_row(self, row, idx + 2))
            .collect()
    }

    // ==========================================
    // 字段提取
    // ==========================================

    /// 提取字符串字段（空白视为缺失）
    fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        row.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn require_string(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<String> {
        self.get_string(row, key)
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: key.to_string(),
            })
    }

    /// 解析浮点数
    fn parse_f64(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<Option<f64>> {
        match self.get_string(row, key) {
            None => Ok(None),
            Some(value) => value
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ImportError::TypeConversionError {
                    row: row_number,
                    field: key.to_string(),
                    message: format!("无法解析为浮点数: {}", value),
                }),
        }
    }

    fn require_f64(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<f64> {
        self.parse_f64(row, key, row_number)?
            .ok_or_else(|| ImportError::MissingField {
                row: row_number,
                field: key.to_string(),
            })
    }

    /// 解析整数
    ///
    /// Excel 数值单元格会以 "120" 或 "120.0" 形式出现,小数部分为 0 时接受
    fn require_i64(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<i64> {
        let value = self.require_string(row, key, row_number)?;
        if let Ok(v) = value.parse::<i64>() {
            return Ok(v);
        }
        match value.parse::<f64>() {
            Ok(v) if v.fract() == 0.0 && v.is_finite() => Ok(v as i64),
            _ => Err(ImportError::TypeConversionError {
                row: row_number,
                field: key.to_string(),
                message: format!("无法解析为整数: {}", value),
            }),
        }
    }

    /// 解析日期（YYYY-MM-DD / YYYYMMDD / 日期时间）
    fn require_date(&self, row: &RawRow, key: &str, row_number: usize) -> ImportResult<NaiveDate> {
        let value = self.require_string(row, key, row_number)?;
        parse_date_best_effort(&value).ok_or(ImportError::DateFormatError {
            row: row_number,
            field: key.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn inventory_row() -> RawRow {
        row(&[
            ("LOCATION", "Jawa Tengah"),
            ("ITEM", "RegimenA"),
            ("DATE", "2025-03-31"),
            ("CLOSING_STOCK", "900"),
            ("TB_CASES_ACTIVE", "200.0"),
            ("LEAD_TIME_DAYS", "20"),
            ("TB_RISK_SCORE", "6.5"),
        ])
    }

    #[test]
    fn test_map_inventory() {
        let obs = FieldMapper.map_inventory(&inventory_row(), 2).unwrap();
        assert_eq!(obs.location, "Jawa Tengah");
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(obs.tb_cases_active, 200);
        assert_eq!(obs.closing_stock, 900.0);
    }

    #[test]
    fn test_map_inventory_missing_field() {
        let mut raw = inventory_row();
        raw.insert("LEAD_TIME_DAYS".to_string(), "  ".to_string());

        match FieldMapper.map_inventory(&raw, 5) {
            Err(ImportError::MissingField { row, field }) => {
                assert_eq!(row, 5);
                assert_eq!(field, "LEAD_TIME_DAYS");
            }
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_map_inventory_bad_values() {
        let mut raw = inventory_row();
        raw.insert("TB_CASES_ACTIVE".to_string(), "12.5".to_string());
        assert!(matches!(
            FieldMapper.map_inventory(&raw, 3),
            Err(ImportError::TypeConversionError { .. })
        ));

        let mut raw = inventory_row();
        raw.insert("DATE".to_string(), "31/31/2025".to_string());
        assert!(matches!(
            FieldMapper.map_inventory(&raw, 3),
            Err(ImportError::DateFormatError { .. })
        ));
    }

    #[test]
    fn test_map_depot_optional_coordinates() {
        let raw = row(&[
            ("DEPOT_ID", "D01"),
            ("DEPOT_NAME", "Depot Medan"),
            ("LOCATION", "Sumatera Utara"),
            ("REGION", "Sumatera"),
            ("STOCK_LEVEL", "1500"),
            ("LATITUDE", "3.59"),
        ]);

        let depot = FieldMapper.map_depot(&raw, 2).unwrap();
        assert_eq!(depot.latitude, Some(3.59));
        assert_eq!(depot.longitude, None);
    }

    #[test]
    fn test_map_all_reports_file_line() {
        let rows = vec![inventory_row(), row(&[("LOCATION", "Bali")])];
        match FieldMapper.map_all(&rows, FieldMapper::map_inventory) {
            Err(ImportError::MissingField { row, field }) => {
                assert_eq!(row, 3);
                assert_eq!(field, "ITEM");
            }
            other => panic!("Expected MissingField, got {:?}", other),
        }
    }
}
