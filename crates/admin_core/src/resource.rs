//! Per-kind glue between wire records, editable drafts and request payloads.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{
        Classroom, ClassroomId, ClassroomPayload, Division, DivisionId, DivisionPayload, RoomType,
        Subject, SubjectId, SubjectPayload, SubjectType, Teacher, TeacherId, TeacherPayload,
    },
    error::ErrorKind,
    protocol::ResourceKind,
};

/// A record type managed by a [`crate::ResourceController`].
pub trait Resource: Clone + fmt::Debug + DeserializeOwned + Send + Sync + 'static {
    type Id: Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static;
    type Draft: Clone + fmt::Debug + Default + PartialEq + Send + Sync + 'static;
    type Payload: Clone + fmt::Debug + Serialize + Send + Sync + 'static;

    const KIND: ResourceKind;

    fn id(&self) -> &Self::Id;

    /// Editable copy of this record's fields.
    fn draft(&self) -> Self::Draft;

    /// Checks required fields and produces the normalized request body.
    fn validate(draft: &Self::Draft) -> Result<Self::Payload, ErrorKind>;
}

/// Splits a comma separated list, trimming each entry and dropping blanks.
/// Order and duplicates are kept.
pub fn split_subjects(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn required_name(name: &str, message: &str) -> Result<String, ErrorKind> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ErrorKind::validation(message));
    }
    Ok(name.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DivisionDraft {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeacherDraft {
    pub name: String,
    /// Raw comma separated input, normalized on save.
    pub subjects: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectDraft {
    pub name: String,
    pub subject_type: SubjectType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassroomDraft {
    pub number: String,
    pub room_type: Option<RoomType>,
}

impl Resource for Division {
    type Id = DivisionId;
    type Draft = DivisionDraft;
    type Payload = DivisionPayload;

    const KIND: ResourceKind = ResourceKind::Division;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn draft(&self) -> Self::Draft {
        DivisionDraft {
            name: self.name.clone(),
        }
    }

    fn validate(draft: &Self::Draft) -> Result<Self::Payload, ErrorKind> {
        Ok(DivisionPayload {
            name: required_name(&draft.name, "Division name is required")?,
        })
    }
}

impl Resource for Teacher {
    type Id = TeacherId;
    type Draft = TeacherDraft;
    type Payload = TeacherPayload;

    const KIND: ResourceKind = ResourceKind::Faculty;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn draft(&self) -> Self::Draft {
        TeacherDraft {
            name: self.name.clone(),
            subjects: self.subjects.join(", "),
        }
    }

    fn validate(draft: &Self::Draft) -> Result<Self::Payload, ErrorKind> {
        Ok(TeacherPayload {
            name: required_name(&draft.name, "Faculty name is required")?,
            subjects: split_subjects(&draft.subjects),
        })
    }
}

impl Resource for Subject {
    type Id = SubjectId;
    type Draft = SubjectDraft;
    type Payload = SubjectPayload;

    const KIND: ResourceKind = ResourceKind::Subject;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn draft(&self) -> Self::Draft {
        SubjectDraft {
            name: self.name.clone(),
            subject_type: self.subject_type,
        }
    }

    fn validate(draft: &Self::Draft) -> Result<Self::Payload, ErrorKind> {
        Ok(SubjectPayload {
            name: required_name(&draft.name, "Subject name is required")?,
            subject_type: draft.subject_type,
        })
    }
}

impl Resource for Classroom {
    type Id = ClassroomId;
    type Draft = ClassroomDraft;
    type Payload = ClassroomPayload;

    const KIND: ResourceKind = ResourceKind::Classroom;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn draft(&self) -> Self::Draft {
        ClassroomDraft {
            number: self.number.clone(),
            room_type: Some(self.room_type),
        }
    }

    fn validate(draft: &Self::Draft) -> Result<Self::Payload, ErrorKind> {
        const MISSING: &str = "Classroom number and type are required";
        let number = required_name(&draft.number, MISSING)?;
        let room_type = draft.room_type.ok_or_else(|| ErrorKind::validation(MISSING))?;
        Ok(ClassroomPayload { number, room_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subjects_are_trimmed_and_blank_segments_dropped() {
        assert_eq!(
            split_subjects("Math,  Chemistry ,"),
            vec!["Math".to_string(), "Chemistry".to_string()]
        );
        assert_eq!(
            split_subjects(" Art , Art,,Music"),
            vec!["Art".to_string(), "Art".to_string(), "Music".to_string()]
        );
        assert!(split_subjects(" , ,").is_empty());
    }

    #[test]
    fn teacher_draft_round_trips_subjects_as_text() {
        let teacher = Teacher {
            id: TeacherId::from(3),
            name: "Dr. A. Sharma".into(),
            subjects: vec!["Math".into(), "Physics".into()],
        };
        let draft = teacher.draft();
        assert_eq!(draft.subjects, "Math, Physics");

        let payload = Teacher::validate(&draft).expect("valid");
        assert_eq!(payload.subjects, teacher.subjects);
    }

    #[test]
    fn blank_names_are_rejected_before_any_request() {
        let err = Division::validate(&DivisionDraft { name: "   ".into() }).expect_err("blank");
        assert_eq!(err, ErrorKind::validation("Division name is required"));

        let err = Classroom::validate(&ClassroomDraft {
            number: "101".into(),
            room_type: None,
        })
        .expect_err("no type");
        assert!(err.is_validation());
    }

    #[test]
    fn names_are_trimmed_in_payloads() {
        let payload = Subject::validate(&SubjectDraft {
            name: "  Physics ".into(),
            subject_type: SubjectType::Lab,
        })
        .expect("valid");
        assert_eq!(payload.name, "Physics");
        assert_eq!(payload.subject_type, SubjectType::Lab);
    }
}
