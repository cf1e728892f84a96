// tests/config.rs
use sales_dashboard::config::app::{ENV_CONFIG_PATH, ENV_ENDPOINT, ENV_HTTP_TIMEOUT_SECS};
use sales_dashboard::config::AppConfig;
use std::{env, fs};

fn clear_env() {
    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_ENDPOINT);
    env::remove_var(ENV_HTTP_TIMEOUT_SECS);
}

#[test]
fn load_from_file_reads_toml() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("dashboard.toml");
    fs::write(
        &p,
        r#"
endpoint = "http://localhost:9000/produtos"
http_timeout_secs = 5
default_top_n = 3
"#,
    )
    .unwrap();
    let cfg = AppConfig::load_from_file(&p).unwrap();
    assert_eq!(cfg.endpoint, "http://localhost:9000/produtos");
    assert_eq!(cfg.http_timeout_secs, 5);
    assert_eq!(cfg.default_top_n.get(), 3);
    assert_eq!(cfg.static_dir, "static");
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing at all -> defaults
    assert_eq!(AppConfig::load_default().unwrap(), AppConfig::default());

    // 2) Fallback ./config/dashboard.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("dashboard.toml"), "default_top_n = 8\n").unwrap();
    assert_eq!(AppConfig::load_default().unwrap().default_top_n.get(), 8);

    // 3) Explicit path wins
    let p_env = tmp.path().join("other.toml");
    fs::write(&p_env, "default_top_n = 2\n").unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(AppConfig::load_default().unwrap().default_top_n.get(), 2);

    // 4) Explicit path that does not exist is an error
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(AppConfig::load_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    // 5) Env overrides on top of the file
    env::set_var(ENV_ENDPOINT, "http://mirror.local/produtos");
    env::set_var(ENV_HTTP_TIMEOUT_SECS, "7");
    let cfg = AppConfig::load_default().unwrap();
    assert_eq!(cfg.endpoint, "http://mirror.local/produtos");
    assert_eq!(cfg.http_timeout_secs, 7);

    env::set_var(ENV_HTTP_TIMEOUT_SECS, "soon");
    assert!(AppConfig::load_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}
