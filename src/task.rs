use crate::error::ProvisionError;
use std::fmt;
use std::str::FromStr;

/// What a run should do. Parsed case-insensitively from `add`/`a` or `delete`/`d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Add,
    Delete,
}

impl FromStr for Task {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" | "a" => Ok(Task::Add),
            "delete" | "d" => Ok(Task::Delete),
            _ => Err(ProvisionError::validation(
                "Please enter a valid task [add | delete].",
            )),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Add => f.write_str("add"),
            Task::Delete => f.write_str("delete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_aliases() {
        assert_eq!("add".parse::<Task>().unwrap(), Task::Add);
        assert_eq!("a".parse::<Task>().unwrap(), Task::Add);
        assert_eq!("ADD".parse::<Task>().unwrap(), Task::Add);
        assert_eq!("delete".parse::<Task>().unwrap(), Task::Delete);
        assert_eq!("D".parse::<Task>().unwrap(), Task::Delete);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for input in ["add", "a", "delete", "d"] {
            let once: Task = input.parse().unwrap();
            let twice: Task = once.to_string().parse().unwrap();
            assert_eq!(once, twice);
        }
        assert_eq!(Task::Add.to_string(), "add");
        assert_eq!(Task::Delete.to_string(), "delete");
    }

    #[test]
    fn test_unknown_task_is_rejected() {
        for input in ["firefox", "", "remove", "ad"] {
            assert!(matches!(
                input.parse::<Task>(),
                Err(ProvisionError::Validation(_))
            ));
        }
    }
}
