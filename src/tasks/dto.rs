use serde::Deserialize;

use crate::tasks::repo_types::{Frequency, NewTask, TaskChanges};
use crate::validation::{require_non_empty, ValidationError};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub name: String,
    pub description: String,
    pub frequency: String,
}

impl CreateTask {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("description", &self.description)?;
        self.frequency.parse::<Frequency>()?;
        Ok(())
    }

    pub fn into_new_task(self) -> Result<NewTask, ValidationError> {
        self.validate()?;
        Ok(NewTask {
            frequency: self.frequency.parse()?,
            name: self.name,
            description: self.description,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub status: Option<bool>,
}

impl UpdateTask {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_none()
            && self.description.is_none()
            && self.frequency.is_none()
            && self.status.is_none()
        {
            return Err(ValidationError::EmptyUpdate);
        }
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(description) = &self.description {
            require_non_empty("description", description)?;
        }
        if let Some(frequency) = &self.frequency {
            frequency.parse::<Frequency>()?;
        }
        Ok(())
    }

    pub fn into_changes(self) -> Result<TaskChanges, ValidationError> {
        self.validate()?;
        Ok(TaskChanges {
            frequency: self.frequency.as_deref().map(str::parse::<Frequency>).transpose()?,
            name: self.name,
            description: self.description,
            status: self.status,
        })
    }
}
