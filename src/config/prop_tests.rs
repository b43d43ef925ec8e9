use super::*;
use proptest::prelude::*;

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9:/._-]{0,24}"
}

// TOML integers are signed 64-bit
fn arb_toml_u64() -> impl Strategy<Value = u64> {
    0u64..=i64::MAX as u64
}

/// Generates an arbitrary ConfigUpdate
fn arb_config_update() -> impl Strategy<Value = ConfigUpdate> {
    (
        (
            prop::option::of(arb_text()),
            prop::option::of(arb_text()),
            prop::option::of(any::<u32>()),
            prop::option::of(arb_toml_u64()),
            prop::option::of(arb_text()),
        ),
        (
            prop::option::of(arb_text()),
            prop::option::of(arb_toml_u64()),
            prop::option::of(arb_text()),
            prop::option::of(arb_text()),
        ),
    )
        .prop_map(
            |(
                (database_url, bind_address, session_ttl_hours, session_sweep_minutes, completion_base_url),
                (completion_model, completion_timeout_secs, completion_api_key, log_dir),
            )| ConfigUpdate {
                database_url,
                bind_address,
                session_ttl_hours,
                session_sweep_minutes,
                completion_base_url,
                completion_model,
                completion_timeout_secs,
                completion_api_key,
                log_dir,
                server_url: None,
            },
        )
}

proptest! {
    /// An empty update changes nothing
    #[test]
    fn prop_empty_update_is_identity(update in arb_config_update()) {
        let config = base_config(None).apply_update(update);
        prop_assert_eq!(config.clone().apply_update(ConfigUpdate::default()), config);
    }

    /// Later updates win field by field
    #[test]
    fn prop_last_write_wins(a in arb_config_update(), b in arb_config_update()) {
        let base = base_config(None);
        let result = base.clone().apply_update(a.clone()).apply_update(b.clone());

        prop_assert_eq!(result.database_url, b.database_url.or(a.database_url).unwrap_or(base.database_url));
        prop_assert_eq!(result.bind_address, b.bind_address.or(a.bind_address).unwrap_or(base.bind_address));
        prop_assert_eq!(result.session_ttl_hours, b.session_ttl_hours.or(a.session_ttl_hours).unwrap_or(base.session_ttl_hours));
        prop_assert_eq!(result.completion_timeout_secs, b.completion_timeout_secs.or(a.completion_timeout_secs).unwrap_or(base.completion_timeout_secs));
        prop_assert_eq!(result.completion_api_key, b.completion_api_key.or(a.completion_api_key));
        prop_assert_eq!(result.log_dir, b.log_dir.or(a.log_dir));
    }

    /// Any session lifetime expressible in the config converts without overflow
    #[test]
    fn prop_session_durations_do_not_overflow(hours in any::<u32>(), minutes in any::<u64>()) {
        let config = Config { session_ttl_hours: hours, session_sweep_minutes: minutes, ..base_config(None) };

        prop_assert_eq!(config.session_ttl().num_hours(), i64::from(hours));
        prop_assert!(config.session_sweep_interval() >= Duration::from_secs(minutes.min(u64::MAX / 60) * 60));
    }

    /// Updates written as TOML load back unchanged
    #[test]
    fn prop_file_update_loads(update in arb_config_update()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, toml::to_string(&update).unwrap()).unwrap();

        prop_assert_eq!(config_from_file(Some(path)).unwrap(), update);
    }
}
