//! Release step definitions
//!
//! The deploy sequence is data: an ordered list of commands derived from
//! the deploy configuration.

use crate::config::env::DeployConfig;

/// A single pipeline step
#[derive(Clone, Debug)]
pub struct Step {
    /// Step identifier (e.g., "docker_build")
    pub name: &'static str,
    /// Display name for logs and summaries
    pub display_name: &'static str,
    /// Program to execute
    pub program: &'static str,
    /// Arguments
    pub args: Vec<String>,
    /// Capture stdout into the report instead of streaming it
    pub capture: bool,
}

impl Step {
    /// Create a streaming step
    pub fn new(
        name: &'static str,
        display_name: &'static str,
        program: &'static str,
        args: Vec<String>,
    ) -> Self {
        Self {
            name,
            display_name,
            program,
            args,
            capture: false,
        }
    }

    /// Create a step whose stdout is captured as a value
    pub fn captured(
        name: &'static str,
        display_name: &'static str,
        program: &'static str,
        args: Vec<String>,
    ) -> Self {
        Self {
            name,
            display_name,
            program,
            args,
            capture: true,
        }
    }

    /// Rendered command line for banner logs
    pub fn command_line(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }
}

/// Build the release sequence for one deploy target
///
/// The list is a pure function of the configuration: the same target
/// always produces the same commands in the same order. Checkout is the
/// CI runner's job; everything after it lives here.
pub fn release_steps(config: &DeployConfig) -> Vec<Step> {
    let image = config.image();

    vec![
        Step::new(
            "auth",
            "Authenticate service account",
            "gcloud",
            args(&[
                "auth",
                "activate-service-account",
                "--key-file",
                &config.key_file,
            ]),
        ),
        Step::new(
            "configure_docker",
            "Configure registry auth",
            "gcloud",
            args(&["auth", "configure-docker", &config.registry_host(), "--quiet"]),
        ),
        Step::new(
            "docker_build",
            "Build image",
            "docker",
            args(&["build", "-t", &image, "."]),
        ),
        Step::new("docker_push", "Push image", "docker", args(&["push", &image])),
        Step::new(
            "deploy",
            "Deploy to Cloud Run",
            "gcloud",
            args(&[
                "run",
                "deploy",
                &config.service,
                "--image",
                &image,
                "--region",
                &config.region,
                "--platform",
                "managed",
                "--allow-unauthenticated",
                "--port",
                "8080",
                "--project",
                &config.project_id,
                "--quiet",
            ]),
        ),
        Step::captured(
            "service_url",
            "Resolve service URL",
            "gcloud",
            args(&[
                "run",
                "services",
                "describe",
                &config.service,
                "--region",
                &config.region,
                "--project",
                &config.project_id,
                "--format",
                "value(status.url)",
            ]),
        ),
    ]
}

/// Build an owned argument vector
fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> DeployConfig {
        DeployConfig {
            project_id: "my-project".to_string(),
            region: "us-central1".to_string(),
            service: "hellorun".to_string(),
            repository: "hellorun-repo".to_string(),
            key_file: "/tmp/key.json".to_string(),
            tag: "abc1234".to_string(),
        }
    }

    #[test]
    fn test_release_step_order() {
        let steps = release_steps(&test_config());
        let names: Vec<&str> = steps.iter().map(|s| s.name).collect();

        assert_eq!(
            names,
            vec![
                "auth",
                "configure_docker",
                "docker_build",
                "docker_push",
                "deploy",
                "service_url",
            ]
        );
    }

    #[test]
    fn test_auth_runs_before_anything_touches_the_registry() {
        let steps = release_steps(&test_config());

        let auth = steps.iter().position(|s| s.name == "auth").unwrap();
        let build = steps.iter().position(|s| s.name == "docker_build").unwrap();
        let push = steps.iter().position(|s| s.name == "docker_push").unwrap();

        assert!(auth < build);
        assert!(build < push);
    }

    #[test]
    fn test_image_reference_shape() {
        let config = test_config();
        let steps = release_steps(&config);

        let image = "us-central1-docker.pkg.dev/my-project/hellorun-repo/hellorun:abc1234";
        assert_eq!(config.image(), image);

        let build = steps.iter().find(|s| s.name == "docker_build").unwrap();
        assert_eq!(build.program, "docker");
        assert!(build.args.iter().any(|a| a == image));
        // Build context is the checkout root
        assert_eq!(build.args.last().map(String::as_str), Some("."));
    }

    #[test]
    fn test_deploy_step_targets_managed_platform() {
        let steps = release_steps(&test_config());
        let deploy = steps.iter().find(|s| s.name == "deploy").unwrap();
        let line = deploy.command_line();

        assert!(line.starts_with("gcloud run deploy hellorun"));
        assert!(line.contains("--platform managed"));
        assert!(line.contains("--port 8080"));
        assert!(line.contains("--region us-central1"));
        assert!(line.contains("--project my-project"));
    }

    #[test]
    fn test_only_the_describe_step_captures_output() {
        let steps = release_steps(&test_config());

        for step in &steps {
            assert_eq!(step.capture, step.name == "service_url");
        }

        let describe = steps.iter().find(|s| s.name == "service_url").unwrap();
        assert!(describe.command_line().contains("value(status.url)"));
    }

    #[test]
    fn test_step_list_is_deterministic() {
        let config = test_config();

        let first: Vec<String> = release_steps(&config)
            .iter()
            .map(Step::command_line)
            .collect();
        let second: Vec<String> = release_steps(&config)
            .iter()
            .map(Step::command_line)
            .collect();

        assert_eq!(first, second);
    }
}
