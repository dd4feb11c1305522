use crate::config::TopologyConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and parse a topology description from a YAML file
pub fn load_config(config_path: &Path) -> Result<TopologyConfig> {
    info!("Loading topology description from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open topology file '{}'", config_path.display()))?;

    let config: TopologyConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse topology file '{}'", config_path.display()))?;

    config.validate()?;

    info!(
        "Loaded {} interfaces and {} declared links",
        config.interfaces.len(),
        config.links.len()
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_topology_config() {
        let yaml = r#"
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
    snr: 15
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.interfaces.len(), 2);
        assert!(config.medium.auto_add_links);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let yaml = r#"
interfaces: []
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }
}
