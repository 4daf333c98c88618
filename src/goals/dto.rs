use serde::Deserialize;

use crate::goals::repo_types::{GoalChanges, NewGoal};
use crate::validation::{parse_date, require_non_empty, ValidationError};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoal {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub target_date: Option<String>,
}

impl CreateGoal {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("description", &self.description)?;
        if let Some(raw) = &self.start_date {
            parse_date("start_date", raw)?;
        }
        if let Some(raw) = &self.target_date {
            parse_date("target_date", raw)?;
        }
        Ok(())
    }

    pub fn into_new_goal(self) -> Result<NewGoal, ValidationError> {
        self.validate()?;
        Ok(NewGoal {
            start_date: self
                .start_date
                .as_deref()
                .map(|d| parse_date("start_date", d))
                .transpose()?,
            target_date: self
                .target_date
                .as_deref()
                .map(|d| parse_date("target_date", d))
                .transpose()?,
            name: self.name,
            description: self.description,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGoal {
    pub name: Option<String>,
    pub description: Option<String>,
    pub completion_status: Option<bool>,
    pub start_date: Option<String>,
    pub target_date: Option<String>,
}

impl UpdateGoal {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.completion_status.is_none()
            && self.start_date.is_none()
            && self.target_date.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(description) = &self.description {
            require_non_empty("description", description)?;
        }
        if let Some(raw) = &self.start_date {
            parse_date("start_date", raw)?;
        }
        if let Some(raw) = &self.target_date {
            parse_date("target_date", raw)?;
        }
        Ok(())
    }

    pub fn into_changes(self) -> Result<GoalChanges, ValidationError> {
        self.validate()?;
        Ok(GoalChanges {
            start_date: self
                .start_date
                .as_deref()
                .map(|d| parse_date("start_date", d))
                .transpose()?,
            target_date: self
                .target_date
                .as_deref()
                .map(|d| parse_date("target_date", d))
                .transpose()?,
            name: self.name,
            description: self.description,
            completion_status: self.completion_status,
        })
    }
}
