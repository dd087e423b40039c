//! CSV export of the student list

use crate::api::Student;

const HEADERS: [&str; 8] = [
    "ID",
    "Name",
    "Email",
    "University",
    "BE Percentage",
    "BE Ranking",
    "Status",
    "Location",
];

/// Render students as CSV, header row first
pub fn students_to_csv<'a>(students: impl IntoIterator<Item = &'a Student>) -> String {
    let mut out = HEADERS.join(",");
    out.push('\n');
    for student in students {
        let row = [
            student.id.as_str().to_string(),
            student.name.clone(),
            student.email.clone(),
            student.university.clone(),
            student
                .be_percentage
                .map(|p| p.to_string())
                .unwrap_or_default(),
            student.be_ranking.map(|r| r.to_string()).unwrap_or_default(),
            student.status.label().to_string(),
            student.location.clone(),
        ];
        let cells: Vec<String> = row.iter().map(|cell| escape(cell)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
