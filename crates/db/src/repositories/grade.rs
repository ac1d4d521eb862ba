//! Grade repository: recording scores and computing report summaries.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::entities::{grades, sea_orm_active_enums::AssessmentKind, students};
use pelita_core::grading::{GradeError as ScoreError, average, validate_score};
use pelita_shared::types::PageRequest;

/// Error types for grade operations.
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    /// Grade not found.
    #[error("Grade not found: {0}")]
    GradeNotFound(Uuid),

    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// The score fails the 0..=100 two-decimal rule.
    #[error(transparent)]
    InvalidScore(#[from] ScoreError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a grade.
#[derive(Debug, Clone)]
pub struct RecordGradeInput {
    /// The student.
    pub student_id: Uuid,
    /// Subject name.
    pub subject: String,
    /// Term label, e.g. "2026-1".
    pub term: String,
    /// Assignment, midterm, or final.
    pub assessment: AssessmentKind,
    /// Score on the 0..=100 scale.
    pub score: Decimal,
    /// Recording user.
    pub recorded_by: Uuid,
}

/// Filter options for listing grades.
#[derive(Debug, Clone, Default)]
pub struct GradeFilter {
    /// Filter by student.
    pub student_id: Option<Uuid>,
    /// Filter by subject.
    pub subject: Option<String>,
    /// Filter by term.
    pub term: Option<String>,
}

/// Per-subject average for one student and term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAverage {
    /// Subject name.
    pub subject: String,
    /// Number of recorded scores.
    pub count: usize,
    /// Average rounded to two decimal places.
    pub average: Decimal,
}

/// Grade repository.
#[derive(Debug, Clone)]
pub struct GradeRepository {
    db: DatabaseConnection,
}

impl GradeRepository {
    /// Creates a new grade repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a grade after validating the score.
    pub async fn record(&self, input: RecordGradeInput) -> Result<grades::Model, GradeError> {
        validate_score(input.score)?;

        students::Entity::find_by_id(input.student_id)
            .one(&self.db)
            .await?
            .ok_or(GradeError::StudentNotFound(input.student_id))?;

        let now = Utc::now().into();
        let grade = grades::ActiveModel {
            id: Set(Uuid::now_v7()),
            student_id: Set(input.student_id),
            subject: Set(input.subject),
            term: Set(input.term),
            assessment: Set(input.assessment),
            score: Set(input.score),
            recorded_by: Set(input.recorded_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(grade.insert(&self.db).await?)
    }

    /// Corrects a recorded score.
    pub async fn correct(&self, id: Uuid, score: Decimal) -> Result<grades::Model, GradeError> {
        validate_score(score)?;

        let grade = grades::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(GradeError::GradeNotFound(id))?;

        let mut active: grades::ActiveModel = grade.into();
        active.score = Set(score);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Removes a grade.
    pub async fn delete(&self, id: Uuid) -> Result<(), GradeError> {
        let grade = grades::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(GradeError::GradeNotFound(id))?;

        grade.delete(&self.db).await?;
        Ok(())
    }

    /// Lists grades with total count.
    pub async fn list(
        &self,
        filter: GradeFilter,
        page: &PageRequest,
    ) -> Result<(Vec<grades::Model>, u64), GradeError> {
        let mut query = grades::Entity::find();

        if let Some(student_id) = filter.student_id {
            query = query.filter(grades::Column::StudentId.eq(student_id));
        }
        if let Some(subject) = filter.subject {
            query = query.filter(grades::Column::Subject.eq(subject));
        }
        if let Some(term) = filter.term {
            query = query.filter(grades::Column::Term.eq(term));
        }

        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_asc(grades::Column::Subject)
            .order_by_asc(grades::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((rows, total))
    }

    /// Per-subject averages for one student and term, subjects in name
    /// order. Subjects with no scores simply do not appear.
    pub async fn report(
        &self,
        student_id: Uuid,
        term: &str,
    ) -> Result<Vec<SubjectAverage>, GradeError> {
        students::Entity::find_by_id(student_id)
            .one(&self.db)
            .await?
            .ok_or(GradeError::StudentNotFound(student_id))?;

        let rows = grades::Entity::find()
            .filter(grades::Column::StudentId.eq(student_id))
            .filter(grades::Column::Term.eq(term))
            .all(&self.db)
            .await?;

        let mut by_subject: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
        for row in rows {
            by_subject.entry(row.subject).or_default().push(row.score);
        }

        Ok(by_subject
            .into_iter()
            .filter_map(|(subject, scores)| {
                average(&scores).map(|avg| SubjectAverage {
                    subject,
                    count: scores.len(),
                    average: avg,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_subject_average_groups_scores() {
        let mut by_subject: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
        by_subject.insert("Matematika".into(), vec![dec!(80), dec!(90)]);
        by_subject.insert("Fisika".into(), vec![dec!(75)]);

        let summary: Vec<SubjectAverage> = by_subject
            .into_iter()
            .filter_map(|(subject, scores)| {
                average(&scores).map(|avg| SubjectAverage {
                    subject,
                    count: scores.len(),
                    average: avg,
                })
            })
            .collect();

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].subject, "Fisika");
        assert_eq!(summary[0].average, dec!(75));
        assert_eq!(summary[1].subject, "Matematika");
        assert_eq!(summary[1].average, dec!(85));
    }
}
