#[cfg(test)]
mod medium_regression_tests {
    use std::cell::RefCell;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use tempfile::NamedTempFile;

    use wmedsim::config_loader::load_config;
    use wmedsim::supervisor::{MediumSupervisor, ProcessLauncher, SupervisorError, SupervisorState};
    use wmedsim::topology::{InterfaceRef, LinkSpec, NullMacResolver, TopologyRegistry};
    use wmedsim::wmediumd::render_config;

    #[derive(Default)]
    struct RecordingLauncher {
        spawned: RefCell<Vec<(String, String, PathBuf)>>,
        terminated: RefCell<Vec<String>>,
    }

    struct SharedLauncher(Rc<RecordingLauncher>);

    impl ProcessLauncher for SharedLauncher {
        fn spawn(&self, session: &str, executable: &str, config_path: &Path) -> std::io::Result<()> {
            self.0.spawned.borrow_mut().push((
                session.to_string(),
                executable.to_string(),
                config_path.to_path_buf(),
            ));
            Ok(())
        }

        fn terminate(&self, session: &str) -> std::io::Result<bool> {
            self.0.terminated.borrow_mut().push(session.to_string());
            Ok(true)
        }
    }

    fn three_station_registry() -> TopologyRegistry {
        let mut registry = TopologyRegistry::new(false, 0);
        registry
            .register_interfaces(vec![
                InterfaceRef::with_mac("sta1", "wlan0", "02:00:00:00:01:00"),
                InterfaceRef::with_mac("sta2", "wlan0", "02:00:00:00:02:00"),
                InterfaceRef::with_mac("sta3", "wlan0", "02:00:00:00:03:00"),
            ])
            .unwrap();
        registry
            .declare_links(vec![
                link("sta1", "sta2", 15),
                link("sta2", "sta1", 15),
                link("sta2", "sta3", 15),
                link("sta3", "sta2", 15),
            ])
            .unwrap();
        registry
    }

    fn link(a: &str, b: &str, snr: i32) -> LinkSpec {
        LinkSpec::with_snr(
            InterfaceRef::new(a, "wlan0"),
            InterfaceRef::new(b, "wlan0"),
            snr,
        )
    }

    /// The reference scenario: a 3-station chain where sta1 and sta3 only
    /// reach each other through sta2.
    #[test]
    fn test_chain_scenario_renders_expected_document() {
        let mut registry = three_station_registry();
        let links = registry.finalize().unwrap();
        let rendered =
            String::from_utf8(render_config(registry.interfaces(), &links, &NullMacResolver).unwrap())
                .unwrap();

        assert!(rendered.contains(
            "ids = [\"02:00:00:00:01:00\", \"02:00:00:00:02:00\", \"02:00:00:00:03:00\"]"
        ));
        for tuple in ["(0, 1, 15)", "(1, 0, 15)", "(1, 2, 15)", "(2, 1, 15)"] {
            assert!(rendered.contains(tuple), "missing {}", tuple);
        }
        // sta1 and sta3 must not be connected directly.
        assert!(!rendered.contains("(0, 2,"));
        assert!(!rendered.contains("(2, 0,"));
        assert_eq!(rendered.matches('(').count() - 1, 4);
    }

    /// Re-parse the rendered document and check every link tuple maps back
    /// to the MAC pair of its declared endpoints.
    #[test]
    fn test_rendered_indices_round_trip_to_macs() {
        let mut registry = three_station_registry();
        let links = registry.finalize().unwrap();
        let rendered =
            String::from_utf8(render_config(registry.interfaces(), &links, &NullMacResolver).unwrap())
                .unwrap();

        let ids_line = rendered
            .lines()
            .find(|l| l.trim_start().starts_with("ids"))
            .unwrap();
        let ids: Vec<&str> = ids_line
            .split('"')
            .skip(1)
            .step_by(2)
            .collect();
        assert_eq!(ids.len(), registry.interfaces().len());

        let tuples: Vec<(usize, usize, i32)> = rendered
            .lines()
            .filter(|l| l.trim_start().starts_with('('))
            .map(|l| {
                let inner = l.trim().trim_start_matches('(').trim_end_matches([',', ')']);
                let mut fields = inner.split(',').map(|f| f.trim());
                (
                    fields.next().unwrap().parse().unwrap(),
                    fields.next().unwrap().parse().unwrap(),
                    fields.next().unwrap().parse().unwrap(),
                )
            })
            .collect();
        assert_eq!(tuples.len(), links.len());

        for (link, (a, b, snr)) in links.iter().zip(&tuples) {
            let sta1 = registry.get(&link.sta1().identifier()).unwrap();
            let sta2 = registry.get(&link.sta2().identifier()).unwrap();
            assert_eq!(ids[*a], sta1.cached_mac().unwrap());
            assert_eq!(ids[*b], sta2.cached_mac().unwrap());
            assert_eq!(*snr, link.snr());
        }
    }

    /// YAML description through registry, supervisor and renderer in one go.
    #[test]
    fn test_yaml_to_running_medium() {
        let yaml = r#"
medium:
  executable: wmediumd
  auto_add_links: true
  default_snr: 0

interfaces:
  - node: sta1
    intf: wlan0
    mac: "02:00:00:00:01:00"
  - node: sta2
    intf: wlan0
    mac: "02:00:00:00:02:00"

links:
  - from: sta1.wlan0
    to: sta2.wlan0
    snr: 20
"#;
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        let mut registry = config.build_registry().unwrap();

        let launcher = Rc::new(RecordingLauncher::default());
        let mut supervisor =
            MediumSupervisor::with_launcher(Box::new(SharedLauncher(Rc::clone(&launcher))));
        supervisor
            .configure(&mut registry, &NullMacResolver, &config.medium.executable)
            .unwrap();
        assert_eq!(supervisor.state(), SupervisorState::Configured);

        supervisor.start().unwrap();
        let written_path = supervisor.config_path().unwrap().to_path_buf();
        let written = std::fs::read_to_string(&written_path).unwrap();

        // Declared link kept, reverse direction auto-added with SNR 0.
        assert!(written.contains("(0, 1, 20)"));
        assert!(written.contains("(1, 0, 0)"));

        {
            let spawned = launcher.spawned.borrow();
            assert_eq!(spawned.len(), 1);
            assert_eq!(spawned[0].1, "wmediumd");
            assert_eq!(spawned[0].2, written_path);
        }

        supervisor.stop().unwrap();
        assert_eq!(supervisor.state(), SupervisorState::Stopped);
        assert!(!written_path.exists());
        assert_eq!(launcher.terminated.borrow().len(), 1);
    }

    /// Lifecycle errors surface without disturbing the running process.
    #[test]
    fn test_lifecycle_misuse_is_rejected() {
        let mut registry = three_station_registry();

        let launcher = Rc::new(RecordingLauncher::default());
        let mut supervisor =
            MediumSupervisor::with_launcher(Box::new(SharedLauncher(Rc::clone(&launcher))));

        assert!(matches!(supervisor.stop(), Err(SupervisorError::NotRunning)));
        assert!(matches!(supervisor.start(), Err(SupervisorError::NotConfigured)));

        supervisor
            .configure(&mut registry, &NullMacResolver, "wmediumd")
            .unwrap();
        supervisor.start().unwrap();

        assert!(matches!(supervisor.start(), Err(SupervisorError::AlreadyRunning)));
        assert!(matches!(
            supervisor.configure(&mut registry, &NullMacResolver, "wmediumd"),
            Err(SupervisorError::AlreadyRunning)
        ));
        assert_eq!(launcher.spawned.borrow().len(), 1);

        supervisor.stop().unwrap();
    }
}
