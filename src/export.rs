use crate::models::DayRow;

pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

const HEADER: &str = "data,demandas,acessos";

/// Header line, a newline, then one `data,demandas,acessos` line per row.
/// Values never contain commas, so nothing is quoted.
pub fn to_csv(rows: &[DayRow]) -> String {
    let body = rows
        .iter()
        .map(|row| format!("{},{},{}", row.data, row.demandas, row.acessos))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{HEADER}\n{body}")
}

pub fn week_filename(week_start: &str, today: &str) -> String {
    format!("contador_detransp_semana_{week_start}_a_{today}.csv")
}

pub fn all_filename(today: &str) -> String {
    format!("contador_detransp_todos_{today}.csv")
}
