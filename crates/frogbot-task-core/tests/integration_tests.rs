use frogbot_task_core::host::{ExecOutput, HostError, Integration, LogLevel};
use frogbot_task_core::{
    execute_task, load_config, DryRunHost, HostConfig, MemoryHost, OsFamily, ProcessHost,
    TaskError,
};
use std::path::{Path, PathBuf};

const ACCESS_TOKEN: &str = "csvpkwgnekrjngkrejgnk";
const GIT_TOKEN: &str = "gh_ighrxzvtgwerderiedlkngdawpoekmglkgskdjfgkg";

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(fut)
}

/// Workspace root (two levels up from CARGO_MANIFEST_DIR of frogbot-task-core).
fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap() // crates/
        .parent()
        .unwrap()
        .to_path_buf()
}

fn pipeline_host(os_family: &str) -> MemoryHost {
    MemoryHost::new()
        .with_os_family(os_family)
        .with_input("repository", "user/frogbot")
        .with_input("accessToken", "jfrogAccessToken")
        .with_input("gitToken", "ghIntName")
        .with_input("provider", "github")
        .with_input("endPoint", "https://api.github.com")
        .with_input("botAction", "scan-pr")
        .with_input("platformURL", "https://test.jfrog.com")
        .with_input("pullRequestID", "2345")
        .with_variable("EXECUTION_PATH", "resource/src")
        .with_variable("RESOLVE_REPO", "npm-remote")
        .with_integration(
            Integration::new("jfrogAccessToken").with_value("accessToken", ACCESS_TOKEN),
        )
        .with_integration(Integration::new("ghIntName").with_value("token", GIT_TOKEN))
}

fn exported_value(host: &MemoryHost, key: &str) -> Option<String> {
    host.exported()
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}

// ─── Full task runs ───

#[test]
fn test_end_to_end_posix() {
    let host = pipeline_host("Linux");
    let summary = block_on(execute_task(&host)).unwrap();

    assert_eq!(exported_value(&host, "JF_GIT_REPO").as_deref(), Some("frogbot"));
    assert_eq!(exported_value(&host, "JF_GIT_OWNER").as_deref(), Some("user"));
    assert_eq!(exported_value(&host, "JF_ACCESS_TOKEN").as_deref(), Some(ACCESS_TOKEN));
    assert_eq!(exported_value(&host, "JF_GIT_TOKEN").as_deref(), Some(GIT_TOKEN));
    assert_eq!(
        exported_value(&host, "JF_INSTALL_DEPS_CMD").as_deref(),
        Some("jf npmc npm-remote")
    );
    assert_eq!(host.exported().len(), 9);

    assert_eq!(
        host.commands(),
        vec![
            "cd resource/src && curl -fLg \"https://releases.jfrog.io/artifactory/frogbot/v2/[RELEASE]/getFrogbot.sh\" | sh",
            "cd resource/src && ./frogbot scan-pr",
        ]
    );
    assert_eq!(summary.action, "scan-pr");
    assert_eq!(summary.os_family, OsFamily::Posix);
    assert_eq!(summary.exported_keys.len(), 9);
    assert!(summary.finished_at >= summary.started_at);
    assert!(host.logged(LogLevel::Info, "Completed setting up frogbot environment."));
    assert!(host.logged(LogLevel::Info, "Downloaded binary successfully"));
}

#[test]
fn test_end_to_end_windows() {
    let host = pipeline_host("WINDOWS");
    block_on(execute_task(&host)).unwrap();

    assert_eq!(
        host.commands(),
        vec![
            "iwr https://releases.jfrog.io/artifactory/frogbot/v2/[RELEASE]/frogbot-windows-amd64/frogbot.exe -OutFile frogbot.exe",
            "cd resource/src && frogbot.exe scan-pr",
        ]
    );
}

// ─── Short-circuiting ───

#[test]
fn test_validation_failure_stops_everything() {
    let host = pipeline_host("Linux").with_input("botAction", "");
    let err = block_on(execute_task(&host)).unwrap_err();

    assert!(matches!(err, TaskError::Validation { .. }));
    assert!(host.exported().is_empty());
    assert!(host.commands().is_empty());
}

#[test]
fn test_missing_secret_publishes_nothing() {
    let host = pipeline_host("Linux")
        .with_integration(Integration::new("ghIntName").with_value("token", ""));
    let err = block_on(execute_task(&host)).unwrap_err();

    assert!(matches!(err, TaskError::MissingSecret { .. }));
    assert_eq!(err.stage(), "build-environment");
    assert!(host.exported().is_empty());
    assert!(host.commands().is_empty());
}

#[test]
fn test_unknown_integration_fails_task() {
    let host = pipeline_host("Linux").with_input("accessToken", "noSuchIntegration");
    let err = block_on(execute_task(&host)).unwrap_err();

    assert!(matches!(err, TaskError::IntegrationLookup { .. }));
    assert!(err.to_string().contains("noSuchIntegration"));
}

#[test]
fn test_download_failure_keeps_environment_and_skips_run() {
    let host = pipeline_host("Linux");
    host.push_response(Err(HostError::CommandFailed {
        command: "curl".to_string(),
        status: Some(22),
        stdout: String::new(),
        stderr: "The requested URL returned error: 404".to_string(),
    }));

    let err = block_on(execute_task(&host)).unwrap_err();

    assert!(matches!(err, TaskError::Download(_)));
    assert_eq!(host.exported().len(), 9);
    assert_eq!(host.commands().len(), 1);
    assert!(host.logged(LogLevel::Error, "returned error: 404"));
}

#[test]
fn test_run_failure_is_task_failure() {
    let host = pipeline_host("Linux");
    host.push_response(Ok(ExecOutput::default()));
    host.push_response(Err(HostError::CommandFailed {
        command: "./frogbot scan-pr".to_string(),
        status: Some(1),
        stdout: String::new(),
        stderr: "Failed to execute".to_string(),
    }));

    let err = block_on(execute_task(&host)).unwrap_err();
    assert!(matches!(err, TaskError::Execution(_)));
    assert_eq!(err.stage(), "run-frogbot");
}

#[test]
fn test_failed_run_error_never_carries_secrets() {
    let host = pipeline_host("Linux");
    host.push_response(Ok(ExecOutput::default()));
    host.push_response(Err(HostError::CommandFailed {
        command: "./frogbot scan-pr".to_string(),
        status: Some(1),
        stdout: format!("1 issue found\ncloning with {}", GIT_TOKEN),
        stderr: format!("401 Bad credentials using token {}", GIT_TOKEN),
    }));

    let err = block_on(execute_task(&host)).unwrap_err();

    let mut chain: Vec<String> = Vec::new();
    let mut current: Option<&dyn std::error::Error> = Some(&err);
    while let Some(e) = current {
        chain.push(e.to_string());
        current = e.source();
    }
    assert!(chain.len() >= 2);
    for msg in &chain {
        assert!(!msg.contains(GIT_TOKEN), "leaked git token: {msg}");
        assert!(!msg.contains(ACCESS_TOKEN), "leaked access token: {msg}");
    }
    assert!(!format!("{err:?}").contains(GIT_TOKEN));

    for (_, msg) in host.logs() {
        assert!(!msg.contains(GIT_TOKEN), "leaked git token: {msg}");
    }
    assert!(host.logged(LogLevel::Info, "1 issue found"));
    assert!(host.logged(LogLevel::Info, "cloning with ***"));
    assert!(host.logged(LogLevel::Error, "using token ***"));
}

// ─── Logging hygiene ───

#[test]
fn test_secrets_never_logged() {
    let host = pipeline_host("Linux");
    host.push_response(Ok(ExecOutput::default()));
    host.push_response(Ok(ExecOutput::new(
        format!("authenticated with {}", GIT_TOKEN),
        "",
    )));

    block_on(execute_task(&host)).unwrap();

    for (_, msg) in host.logs() {
        assert!(!msg.contains(ACCESS_TOKEN), "leaked access token: {msg}");
        assert!(!msg.contains(GIT_TOKEN), "leaked git token: {msg}");
    }
    assert!(host.logged(LogLevel::Info, "authenticated with ***"));
}

// ─── Dry run over the process host ───

#[test]
fn test_dry_run_over_process_host() {
    let mut config = HostConfig {
        os_family: Some("Linux".to_string()),
        ..Default::default()
    };
    for pair in [
        "repository=user/frogbot",
        "accessToken=jfrogAccessToken",
        "gitToken=ghIntName",
        "provider=github",
        "endPoint=https://api.github.com",
        "botAction=scan-repository",
        "platformURL=https://test.jfrog.com",
    ] {
        config.set_input(pair).unwrap();
    }
    config.set_variable("EXECUTION_PATH=/tmp/frogbot").unwrap();
    config.integrations.insert(
        "jfrogAccessToken".to_string(),
        [("accessToken".to_string(), ACCESS_TOKEN.to_string())].into(),
    );
    config.integrations.insert(
        "ghIntName".to_string(),
        [("token".to_string(), GIT_TOKEN.to_string())].into(),
    );

    let host = DryRunHost::new(ProcessHost::new(config));
    block_on(execute_task(&host)).unwrap();

    assert_eq!(
        host.commands(),
        vec![
            "cd /tmp/frogbot && curl -fLg \"https://releases.jfrog.io/artifactory/frogbot/v2/[RELEASE]/getFrogbot.sh\" | sh",
            "cd /tmp/frogbot && ./frogbot scan-repository",
        ]
    );
    let exported = host.inner().exported();
    assert!(exported.contains(&("JF_GIT_OWNER".to_string(), "user".to_string())));
    assert_eq!(exported[0].0, "JF_GIT_REPO");
}

#[test]
fn test_example_config_drives_a_dry_run() {
    let config = load_config(&workspace_root().join("frogbot-task.example.toml")).unwrap();
    assert_eq!(config.inputs.len(), 8);

    let host = DryRunHost::new(ProcessHost::new(HostConfig {
        os_family: Some("windows".to_string()),
        ..config
    }));
    let summary = block_on(execute_task(&host)).unwrap();

    assert_eq!(summary.os_family, OsFamily::Windows);
    assert_eq!(
        host.commands()[1],
        "cd /tmp/frogbot && frogbot.exe scan-pull-request"
    );
    assert!(host
        .inner()
        .exported()
        .contains(&("JF_INSTALL_DEPS_CMD".to_string(), "jf npmc npm-remote".to_string())));
}
