use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["storemap"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_stores_filters() {
    let cli = Cli::try_parse_from([
        "storemap",
        "stores",
        "--query",
        "mart",
        "--district",
        "Ba Dinh",
        "--heatmap",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Stores {
        query,
        district,
        heatmap,
    }) = cli.command
    else {
        panic!("expected stores command");
    };
    assert_eq!(query.as_deref(), Some("mart"));
    assert_eq!(district.as_deref(), Some("Ba Dinh"));
    assert!(heatmap);
}

#[test]
fn locate_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from(["storemap", "locate", "--lat", "-33.86", "--lng", "151.2"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Locate { lat, lng }) if (lat + 33.86).abs() < 1e-9 && (lng - 151.2).abs() < 1e-9
    ));
}

#[test]
fn locate_requires_both_coordinates() {
    assert!(Cli::try_parse_from(["storemap", "locate", "--lat", "21.0"]).is_err());
}

#[test]
fn parses_store_create_with_global_credentials() {
    let cli = Cli::try_parse_from([
        "storemap",
        "store",
        "create",
        "--name",
        "Mart",
        "--lat",
        "21.03",
        "--lng",
        "105.82",
        "--hours",
        "08:00-22:00",
        "--username",
        "admin",
    ])
    .expect("expected valid cli args");

    assert_eq!(cli.username.as_deref(), Some("admin"));
    let Some(Commands::Store {
        command: StoreCommands::Create(fields),
    }) = cli.command
    else {
        panic!("expected store create");
    };
    assert_eq!(fields.name, "Mart");
    assert_eq!(fields.open_hours, "08:00-22:00");
    assert_eq!(fields.address, "");
    assert!(fields.image.is_none());
}

#[test]
fn parses_store_update_with_original_name() {
    let cli = Cli::try_parse_from([
        "storemap", "store", "update", "--original", "Old", "--name", "New", "--lat", "21", "--lng",
        "105",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Store {
            command: StoreCommands::Update { ref original, .. }
        }) if original == "Old"
    ));
}

#[test]
fn parses_store_delete() {
    let cli = Cli::try_parse_from(["storemap", "store", "delete", "--name", "Mart"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Store {
            command: StoreCommands::Delete { ref name }
        }) if name == "Mart"
    ));
}

#[test]
fn parses_interactive() {
    let cli = Cli::try_parse_from(["storemap", "interactive"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Interactive)));
}

fn config_with_admin(username: Option<&str>, password: Option<&str>) -> storemap_core::AppConfig {
    storemap_core::AppConfig {
        api_url: "http://127.0.0.1:5000".to_string(),
        env: storemap_core::Environment::Development,
        log_level: "info".to_string(),
        request_timeout_secs: 30,
        user_agent: "storemap-test".to_string(),
        max_attempts: 3,
        retry_delay_ms: 1000,
        search_debounce_ms: 300,
        admin_username: username.map(str::to_string),
        admin_password: password.map(str::to_string),
    }
}

#[test]
fn credentials_prefer_flags_over_config() {
    let cli = Cli::try_parse_from(["storemap", "--username", "flag-user", "stats"]).unwrap();
    let config = config_with_admin(Some("env-user"), Some("env-pass"));

    let creds = Credentials::resolve(&cli, &config).expect("credentials");
    assert_eq!(creds.username, "flag-user");
    assert_eq!(creds.password, "env-pass");
}

#[test]
fn credentials_missing_without_password() {
    let cli = Cli::try_parse_from(["storemap", "--username", "admin", "stats"]).unwrap();
    let config = config_with_admin(None, None);
    assert!(Credentials::resolve(&cli, &config).is_none());
}
