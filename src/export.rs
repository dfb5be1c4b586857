//! Read-only export: a pure transformation of already-fetched snapshots
//! into a workbook-like container with exactly three named tables. No
//! network access happens here; the caller supplies the collections.

use serde::{Deserialize, Serialize};

use crate::model::{candidate::Candidate, election::ElectionWindow};

/// One named table of the export artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The export artifact: a workbook with exactly the three named sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

fn format_time(window: &ElectionWindow, start: bool) -> String {
    let time = if start {
        window.start_time
    } else {
        window.end_time
    };
    time.format("%Y-%m-%d %H:%M").to_string()
}

/// Build the export workbook. Row counts equal the input collection lengths
/// exactly: one row per candidate, per post, per authorized address.
pub fn export_workbook(
    candidates: &[Candidate],
    elections: &[(String, ElectionWindow)],
    authorized: &[String],
) -> Workbook {
    let candidate_rows = candidates
        .iter()
        .map(|candidate| {
            vec![
                candidate.id.to_string(),
                candidate.name.clone(),
                candidate.party.clone(),
                candidate.post.clone(),
                candidate.vote_count.to_string(),
            ]
        })
        .collect();

    let election_rows = elections
        .iter()
        .map(|(post, window)| {
            vec![
                post.clone(),
                window.state.label().to_string(),
                format_time(window, true),
                format_time(window, false),
            ]
        })
        .collect();

    let voter_rows = authorized
        .iter()
        .map(|address| vec![address.clone()])
        .collect();

    Workbook {
        sheets: vec![
            Sheet {
                name: "Candidates".into(),
                columns: ["ID", "Name", "Party", "Post", "Votes"]
                    .map(String::from)
                    .to_vec(),
                rows: candidate_rows,
            },
            Sheet {
                name: "Elections".into(),
                columns: ["Post", "Status", "StartTime", "EndTime"]
                    .map(String::from)
                    .to_vec(),
                rows: election_rows,
            },
            Sheet {
                name: "Authorized Voters".into(),
                columns: vec!["Address".into()],
                rows: voter_rows,
            },
        ],
    }
}
