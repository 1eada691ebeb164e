//! Multi-entry parser: rebuilds repeated sub-entities from parallel
//! pipe-separated columns.
//!
//! Each group is a set of K columns whose cells are split on `|`. The i-th
//! segment of every column forms the i-th entity. The group yields
//! N = max(segment count) entities and shorter columns are padded with empty
//! strings, so the result is always a rectangular N×K grid. An empty primary
//! column means the entity type is absent for the row.
//!
//! A JSON row may carry a group as structured entries instead; those are
//! deserialized directly and take precedence over the pipe columns.

use placement_core::student::{
  Achievement, Certification, Experience, Project, ResearchPublication,
  StudentRecord,
};

use serde::de::DeserializeOwned;

use crate::{
  headers::{self, Aliases},
  normalize::split_list,
  row::RawRow,
};

/// Split every column of a group and align the segments into rows of `K`
/// trimmed strings.
pub fn grid<const K: usize>(row: &RawRow, group: &[Aliases; K]) -> Vec<[String; K]> {
  let columns: [Vec<String>; K] = std::array::from_fn(|k| {
    let text = row.text(group[k]);
    if text.is_empty() {
      Vec::new()
    } else {
      text.split('|').map(|seg| seg.trim().to_owned()).collect()
    }
  });

  if columns[0].is_empty() {
    return Vec::new();
  }

  let n = columns.iter().map(Vec::len).max().unwrap_or(0);
  (0..n)
    .map(|i| std::array::from_fn(|k| columns[k].get(i).cloned().unwrap_or_default()))
    .collect()
}

/// Deserialize the structured entries filed under the group's primary
/// column. Entries that do not fit the entity shape are dropped.
fn structured<T: DeserializeOwned, const K: usize>(
  row: &RawRow,
  group: &[Aliases; K],
) -> Option<Vec<T>> {
  let items = row.entries(group[0])?;
  let parsed = items
    .iter()
    .filter_map(|item| match serde_json::from_value(item.clone()) {
      Ok(entity) => Some(entity),
      Err(e) => {
        tracing::warn!(group = group[0][0], error = %e, "dropping malformed entry");
        None
      }
    })
    .collect();
  Some(parsed)
}

/// Fill every sub-entity sequence of `record` from `row`.
pub fn parse_entries(row: &RawRow, record: &mut StudentRecord) {
  record.achievements = achievements(row);
  record.experience = experience(row);
  record.projects = projects(row);
  record.certifications = certifications(row);
  record.research_publications = publications(row);
}

pub fn achievements(row: &RawRow) -> Vec<Achievement> {
  if let Some(items) = structured(row, &headers::ACHIEVEMENTS) {
    return items;
  }
  grid(row, &headers::ACHIEVEMENTS)
    .into_iter()
    .map(|[title, description, date, certificate]| Achievement {
      title,
      description,
      date: non_empty(date),
      certificate: non_empty(certificate),
    })
    .collect()
}

pub fn experience(row: &RawRow) -> Vec<Experience> {
  if let Some(items) = structured(row, &headers::EXPERIENCE) {
    return items;
  }
  grid(row, &headers::EXPERIENCE)
    .into_iter()
    .map(|[company, role, duration, description, certificate]| Experience {
      company,
      role,
      duration,
      description,
      certificate: non_empty(certificate),
    })
    .collect()
}

pub fn projects(row: &RawRow) -> Vec<Project> {
  if let Some(items) = structured(row, &headers::PROJECTS) {
    return items;
  }
  grid(row, &headers::PROJECTS)
    .into_iter()
    .map(|[title, description, tech, links, github, live]| Project {
      title,
      description,
      tech_stack: split_list(&tech),
      links: split_list(&links),
      github_url: non_empty(github),
      live_preview: non_empty(live),
    })
    .collect()
}

pub fn certifications(row: &RawRow) -> Vec<Certification> {
  if let Some(items) = structured(row, &headers::CERTIFICATIONS) {
    return items;
  }
  grid(row, &headers::CERTIFICATIONS)
    .into_iter()
    .map(|[name, issuer, year, certificate]| Certification {
      name,
      issuer,
      year: year_of(&year),
      certificate: non_empty(certificate),
    })
    .collect()
}

pub fn publications(row: &RawRow) -> Vec<ResearchPublication> {
  if let Some(items) = structured(row, &headers::PUBLICATIONS) {
    return items;
  }
  grid(row, &headers::PUBLICATIONS)
    .into_iter()
    .map(|[title, journal, year, authors, url]| ResearchPublication {
      title,
      journal: non_empty(journal),
      year: year_of(&year),
      authors: split_list(&authors),
      paper_url: non_empty(url),
    })
    .collect()
}

fn non_empty(s: String) -> Option<String> { Some(s).filter(|s| !s.is_empty()) }

/// `0` when the segment is not a whole number.
fn year_of(s: &str) -> i32 { s.parse().unwrap_or(0) }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn shorter_columns_are_padded_not_truncated() {
    let row = RawRow::new()
      .with("Experience", "Startup X|Acme|Globex")
      .with("Experience Role", "Intern");

    let items = experience(&row);
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].company, "Startup X");
    assert_eq!(items[0].role, "Intern");
    assert_eq!(items[1].company, "Acme");
    assert_eq!(items[1].role, "");
    assert_eq!(items[2].role, "");
    assert_eq!(items[2].duration, "");
  }

  #[test]
  fn longer_secondary_column_extends_the_grid() {
    let row = RawRow::new()
      .with("Experience", "Startup X")
      .with("Experience Duration", "Jun 2024|Jan 2025");

    let items = experience(&row);
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].company, "");
    assert_eq!(items[1].duration, "Jan 2025");
  }

  #[test]
  fn empty_primary_column_yields_nothing() {
    let row = RawRow::new()
      .with("Projects", "  ")
      .with("Project Description", "orphaned|descriptions")
      .with("Project Tech", "Rust");
    assert!(projects(&row).is_empty());
    assert!(achievements(&RawRow::new()).is_empty());
  }

  #[test]
  fn trailing_pipe_keeps_an_empty_item() {
    let row = RawRow::new().with("Achievements", "Batch Topper|");
    let items = achievements(&row);
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].title, "");
  }

  #[test]
  fn projects_split_tech_and_links_on_commas() {
    let row = RawRow::new()
      .with("Projects", "TTS | Scanner")
      .with("Project Tech", "Python, AWS Lambda | Python,Nmap")
      .with("Project Links", "https://github.com/a/tts|")
      .with("Project GitHub", "|https://github.com/a/scanner");

    let items = projects(&row);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "TTS");
    assert_eq!(items[0].tech_stack, ["Python", "AWS Lambda"]);
    assert_eq!(items[0].links, ["https://github.com/a/tts"]);
    assert!(items[0].github_url.is_none());
    assert!(items[1].links.is_empty());
    assert_eq!(items[1].github_url.as_deref(), Some("https://github.com/a/scanner"));
  }

  #[test]
  fn certification_years_parse_or_zero() {
    let row = RawRow::new()
      .with("Certifications", "AWS CP|CEH")
      .with("Certification Issuer", "Amazon|EC-Council")
      .with("Certification Year", "2024|soon");

    let items = certifications(&row);
    assert_eq!(items[0].year, 2024);
    assert_eq!(items[1].year, 0);
  }

  #[test]
  fn numeric_year_cell_is_read_as_integer() {
    let row = RawRow::new()
      .with("Research Publications", "Gujarati TTS")
      .with("Publication Year", 2023.0)
      .with("Publication Authors", "A. Patel, P. Sharma");

    let items = publications(&row);
    assert_eq!(items[0].year, 2023);
    assert_eq!(items[0].authors, ["A. Patel", "P. Sharma"]);
    assert!(items[0].journal.is_none());
  }

  #[test]
  fn camel_case_group_columns_are_read() {
    let row = RawRow::new()
      .with("experience", "Startup X|Acme")
      .with("experienceRole", "Intern|SDE")
      .with("certificationYear", "2024")
      .with("certifications", "AWS CP");

    let items = experience(&row);
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].role, "SDE");
    assert_eq!(certifications(&row)[0].year, 2024);
  }

  #[test]
  fn structured_entries_win_over_pipe_columns() {
    use serde_json::json;

    let mut row = RawRow::new().with("Projects", "From|Columns");
    row.push_entries("projects", vec![
      json!({
        "title": "TTS",
        "techStack": ["Python", "AWS"],
        "githubUrl": "https://github.com/a/tts",
      }),
      json!({ "title": 42 }),
    ]);

    let items = projects(&row);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "TTS");
    assert_eq!(items[0].tech_stack, ["Python", "AWS"]);
    assert_eq!(items[0].github_url.as_deref(), Some("https://github.com/a/tts"));
  }
}
