// AWS CLI response types.
// Defines structs for deserializing `aws logs` JSON output.

use serde::{Deserialize, Serialize};

/// Output of `aws logs describe-log-groups --output json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeLogGroupsResponse {
    #[serde(default)]
    pub log_groups: Vec<LogGroup>,
}

/// CloudWatch log group metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGroup {
    pub log_group_name: String,
    pub retention_in_days: Option<u32>,
    pub stored_bytes: Option<u64>,
    /// Milliseconds since the Unix epoch.
    pub creation_time: Option<i64>,
}

impl DescribeLogGroupsResponse {
    /// Flatten into log group names, keeping the listing order.
    pub fn into_names(self) -> Vec<String> {
        self.log_groups
            .into_iter()
            .map(|group| group.log_group_name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_describe_log_groups() {
        let json = r#"{
            "logGroups": [
                {
                    "logGroupName": "/aws/lambda/orders-api",
                    "creationTime": 1718000000000,
                    "retentionInDays": 14,
                    "metricFilterCount": 0,
                    "arn": "arn:aws:logs:us-east-1:123456789012:log-group:/aws/lambda/orders-api:*",
                    "storedBytes": 20480
                },
                {
                    "logGroupName": "/ecs/worker"
                }
            ]
        }"#;

        let response: DescribeLogGroupsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.log_groups.len(), 2);
        assert_eq!(response.log_groups[0].retention_in_days, Some(14));
        assert_eq!(response.log_groups[1].stored_bytes, None);
        assert_eq!(
            response.into_names(),
            vec!["/aws/lambda/orders-api", "/ecs/worker"]
        );
    }

    #[test]
    fn test_missing_log_groups_is_empty() {
        let response: DescribeLogGroupsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.log_groups.is_empty());
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let result: Result<DescribeLogGroupsResponse, _> =
            serde_json::from_str(r#"{"logGroups": [{"arn": "x"}]}"#);
        assert!(result.is_err());
    }
}
