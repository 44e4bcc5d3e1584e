//! JSON-backed student store
//!
//! The on-disk format is a map of student id to {name, scores}. Writes take
//! an exclusive file lock so two invocations cannot interleave a
//! read-modify-write.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use fs2::FileExt;
use serde::Serialize;

use crate::student::Student;

/// Manager over the students.json data file
pub struct StudentManager {
    data_file: PathBuf,
    students: BTreeMap<String, Student>,
}

/// Aggregate statistics over all students
#[derive(Debug, Serialize)]
pub struct Stats {
    pub count: usize,
    /// Mean of per-student averages, not of all raw scores
    pub average: f64,
}

impl StudentManager {
    /// Load the manager from a data file, starting empty if it is missing
    pub fn load(data_file: &Path) -> Result<Self> {
        let students = if data_file.exists() {
            let content = std::fs::read_to_string(data_file)
                .with_context(|| format!("failed to read {:?}", data_file))?;
            serde_json::from_str(&content)
                .with_context(|| format!("{:?} is not a valid gradebook file", data_file))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            data_file: data_file.to_path_buf(),
            students,
        })
    }

    /// Persist the current state under an exclusive file lock
    fn save(&self) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.data_file)
            .with_context(|| format!("failed to open {:?}", self.data_file))?;
        file.lock_exclusive()
            .context("another gradebook process holds the data file")?;

        let result = (|| -> Result<()> {
            file.set_len(0)?;
            serde_json::to_writer_pretty(&file, &self.students)?;
            Ok(())
        })();

        let _ = fs2::FileExt::unlock(&file);
        result
    }

    /// Add a new student; the id must be unused
    pub fn add(&mut self, student_id: &str, student: Student) -> Result<()> {
        if self.students.contains_key(student_id) {
            bail!("student id '{}' already exists", student_id);
        }
        self.students.insert(student_id.to_string(), student);
        self.save()
    }

    /// Update a student's name and/or merge in new scores
    ///
    /// Scores merge: existing courses keep their values unless the update
    /// names them again.
    pub fn update(
        &mut self,
        student_id: &str,
        name: Option<&str>,
        scores: Option<BTreeMap<String, f64>>,
    ) -> Result<()> {
        let Some(student) = self.students.get_mut(student_id) else {
            bail!("no student with id '{}'", student_id);
        };
        if let Some(name) = name {
            student.name = name.to_string();
        }
        if let Some(scores) = scores {
            student.scores.extend(scores);
        }
        self.save()
    }

    pub fn delete(&mut self, student_id: &str) -> Result<()> {
        if self.students.remove(student_id).is_none() {
            bail!("no student with id '{}'", student_id);
        }
        self.save()
    }

    pub fn get(&self, student_id: &str) -> Result<&Student> {
        self.students
            .get(student_id)
            .ok_or_else(|| anyhow::anyhow!("no student with id '{}'", student_id))
    }

    /// All students sorted by id
    pub fn list(&self) -> Vec<(&String, &Student)> {
        self.students.iter().collect()
    }

    pub fn stats(&self) -> Stats {
        if self.students.is_empty() {
            return Stats {
                count: 0,
                average: 0.0,
            };
        }
        let averages: Vec<f64> = self.students.values().map(|s| s.average()).collect();
        Stats {
            count: self.students.len(),
            average: averages.iter().sum::<f64>() / averages.len() as f64,
        }
    }
}
