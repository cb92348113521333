// ==========================================
// TB CareMap - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 按表头键控的原始行 (HashMap<列名, 值>)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始行记录
pub type RawRow = HashMap<String, String>;

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录
    ///
    /// # 说明
    /// - 表头去除首尾空白并转为大写,与数仓列名对齐
    /// - 完全空白的行被跳过
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

fn normalize_header(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 校验文件存在且扩展名在允许列表内
fn check_file(path: &Path, allowed: &[&str]) -> ImportResult<()> {
    if !path.is_file() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    let ext = extension_of(path);
    if !allowed.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    Ok(())
}

/// 按列位置拼装一行;全空行返回 None
fn assemble_row<I, S>(headers: &[String], cells: I) -> Option<RawRow>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let row: RawRow = headers
        .iter()
        .zip(cells)
        .map(|(header, cell)| (header.clone(), cell.as_ref().trim().to_string()))
        .collect();

    if row.values().all(|v| v.is_empty()) {
        None
    } else {
        Some(row)
    }
}

// ==========================================
// CSV
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_file(file_path, &["csv"])?;

        // 末尾缺省的列按缺失处理
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(File::open(file_path)?);

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            records.extend(assemble_row(&headers, record.iter()));
        }
        Ok(records)
    }
}

// ==========================================
// Excel (取第一个工作表)
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_file(file_path, &["xlsx", "xls"])?;

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("工作簿中没有工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| normalize_header(&cell.to_string()))
                .collect(),
            // 空工作表视为无记录
            None => return Ok(Vec::new()),
        };

        Ok(rows
            .filter_map(|cells| assemble_row(&headers, cells.iter().map(|c| c.to_string())))
            .collect())
    }
}

// ==========================================
// 按扩展名分派
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
