use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NOT_SUBMITTED_MESSAGE: &str = "Работа не сдана на проверку";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn code(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(HomeworkStatus::Approved),
            "reviewing" => Ok(HomeworkStatus::Reviewing),
            "rejected" => Ok(HomeworkStatus::Rejected),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of mapping a homework record to something the user is told.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StatusReport {
    Submitted {
        homework_name: String,
        status: HomeworkStatus,
    },
    NotYetSubmitted,
}

impl StatusReport {
    pub fn message(&self) -> String {
        match self {
            StatusReport::Submitted {
                homework_name,
                status,
            } => format!(
                "Изменился статус проверки работы \"{}\". {}",
                homework_name,
                status.verdict()
            ),
            StatusReport::NotYetSubmitted => NOT_SUBMITTED_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_parse() {
        for status in [
            HomeworkStatus::Approved,
            HomeworkStatus::Reviewing,
            HomeworkStatus::Rejected,
        ] {
            assert_eq!(status.code().parse::<HomeworkStatus>(), Ok(status));
        }
        assert_eq!(
            "Approved".parse::<HomeworkStatus>(),
            Err("Approved".to_string())
        );
    }

    #[test]
    fn test_submitted_message() {
        let report = StatusReport::Submitted {
            homework_name: "hw1".to_string(),
            status: HomeworkStatus::Approved,
        };
        assert_eq!(
            report.message(),
            "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn test_not_submitted_message() {
        assert_eq!(
            StatusReport::NotYetSubmitted.message(),
            "Работа не сдана на проверку"
        );
    }

    #[test]
    fn test_report_serializes_with_state_tag() {
        let report = StatusReport::Submitted {
            homework_name: "hw2".to_string(),
            status: HomeworkStatus::Rejected,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["state"], "submitted");
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["homework_name"], "hw2");
    }
}
