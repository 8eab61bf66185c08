//! The fixed template blobs that make up the bundle.
//!
//! Blobs are grouped into [`Stage`]s in delivery order. Each stage adds
//! files on top of the ones written by the previous stages; together they
//! form a complete Terraform configuration for an EC2 instance running the
//! CloudWatch agent, with alarms, autoscaling, SNS notifications and a
//! dashboard.
//!
//! Content is embedded verbatim. Placeholders such as the example AMI ID,
//! `subnet-xxxxxxxx` and `your-email@example.com` are kept as-is.

use std::{fmt, str::FromStr};

use cwbundle_core::blob::{Blob, BlobFormat};

static MAIN_TF: Blob = Blob::from_static(
    "main.tf",
    include_str!("../templates/main.tf"),
    BlobFormat::Hcl,
);

static CWAGENT_CONFIG_JSON: Blob = Blob::from_static(
    "cwagent-config.json",
    include_str!("../templates/cwagent-config.json"),
    BlobFormat::Json,
);

static ALARMS_DASHBOARD_TF: Blob = Blob::from_static(
    "alarms_dashboard_autoscaling.tf",
    include_str!("../templates/alarms_dashboard_autoscaling.tf"),
    BlobFormat::Hcl,
);

static AUTOSCALING_SNS_TF: Blob = Blob::from_static(
    "autoscaling_sns.tf",
    include_str!("../templates/autoscaling_sns.tf"),
    BlobFormat::Hcl,
);

static MEMORY_SCALING_TF: Blob = Blob::from_static(
    "memory_scaling.tf",
    include_str!("../templates/memory_scaling.tf"),
    BlobFormat::Hcl,
);

static BASE_BLOBS: [&Blob; 2] = [&MAIN_TF, &CWAGENT_CONFIG_JSON];
static ALARMS_BLOBS: [&Blob; 1] = [&ALARMS_DASHBOARD_TF];
static SCALING_BLOBS: [&Blob; 1] = [&AUTOSCALING_SNS_TF];
static MEMORY_BLOBS: [&Blob; 1] = [&MEMORY_SCALING_TF];

/// A delivery step of the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Provider, agent configuration in SSM, EC2 instance and IAM
    Base,
    /// Launch template, autoscaling group, CPU alarm and dashboard
    Alarms,
    /// SNS topic, CPU high/low alarms and scaling policies
    Scaling,
    /// Memory alarm wired to scale-out
    Memory,
}

impl Stage {
    /// All stages in delivery order.
    pub const ALL: [Stage; 4] = [Stage::Base, Stage::Alarms, Stage::Scaling, Stage::Memory];

    pub fn name(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Alarms => "alarms",
            Self::Scaling => "scaling",
            Self::Memory => "memory",
        }
    }

    /// Returns the stage's blobs in write order.
    pub fn blobs(self) -> &'static [&'static Blob] {
        match self {
            Self::Base => &BASE_BLOBS,
            Self::Alarms => &ALARMS_BLOBS,
            Self::Scaling => &SCALING_BLOBS,
            Self::Memory => &MEMORY_BLOBS,
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| {
                format!("unknown stage `{s}`, valid values: base, alarms, scaling, memory")
            })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns every blob of every stage, in delivery order.
pub fn all_blobs() -> Vec<&'static Blob> {
    Stage::ALL
        .into_iter()
        .flat_map(|stage| stage.blobs().iter().copied())
        .collect()
}

/// Looks a blob up by its file name.
pub fn find(name: &str) -> Option<&'static Blob> {
    Stage::ALL
        .into_iter()
        .flat_map(|stage| stage.blobs().iter().copied())
        .find(|blob| blob.name() == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_delivery_order() {
        let names: Vec<&str> = all_blobs().iter().map(|blob| blob.name()).collect();
        assert_eq!(
            names,
            [
                "main.tf",
                "cwagent-config.json",
                "alarms_dashboard_autoscaling.tf",
                "autoscaling_sns.tf",
                "memory_scaling.tf",
            ]
        );
    }

    #[test]
    fn test_names_are_unique_and_valid() {
        let blobs = all_blobs();
        let names: HashSet<&str> = blobs.iter().map(|blob| blob.name()).collect();
        assert_eq!(names.len(), blobs.len());
        assert!(blobs.iter().all(|blob| blob.has_valid_name()));
    }

    #[test]
    fn test_format_matches_extension() {
        for blob in all_blobs() {
            assert_eq!(
                BlobFormat::from_file_name(blob.name()),
                Some(blob.format()),
                "{}",
                blob.name()
            );
        }
    }

    #[test]
    fn test_stage_from_str() {
        for stage in Stage::ALL {
            assert_eq!(stage.name().parse::<Stage>(), Ok(stage));
        }
        assert!("dashboard".parse::<Stage>().is_err());
        assert!("Base".parse::<Stage>().is_err());
    }

    #[test]
    fn test_find() {
        let blob = find("memory_scaling.tf").unwrap();
        assert!(blob.content().contains("mem_used_percent"));
        assert!(find("variables.tf").is_none());
    }

    #[test]
    fn test_placeholders_are_kept() {
        assert!(find("alarms_dashboard_autoscaling.tf")
            .unwrap()
            .content()
            .contains("subnet-xxxxxxxx"));
        assert!(find("autoscaling_sns.tf")
            .unwrap()
            .content()
            .contains("your-email@example.com"));
    }

    #[test]
    fn test_main_tf_references_agent_config() {
        let content = find("main.tf").unwrap().content();
        assert!(content.contains(r#"file("${path.module}/cwagent-config.json")"#));
        assert!(content.contains("us-west-2"));
    }

    #[test]
    fn test_content_is_verbatim() {
        let heads = [
            ("main.tf", "\nprovider \"aws\" {\n"),
            ("cwagent-config.json", "\n{\n"),
            ("alarms_dashboard_autoscaling.tf", "\nresource "),
            ("autoscaling_sns.tf", "\nresource "),
            ("memory_scaling.tf", "\nresource "),
        ];
        for (name, head) in heads {
            let content = find(name).unwrap().content();
            assert!(content.starts_with(head), "{name} starts with {:?}", &content[..12]);
            assert!(content.ends_with('\n'), "{name}");
        }
    }
}
