use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
    pub trajectories: usize,
    pub horizon: f64,
    pub seed: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
    pub angle: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
            trajectories: 10,
            horizon: 4.0,
            seed: 1,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 720,
            target_fps: 60,
            angle: 0.0,
        }
    }
}

pub fn load() -> Config {
    let path = std::path::Path::new("chaotarium.yaml");
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Warning: failed to parse chaotarium.yaml: {e}; using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: failed to read chaotarium.yaml: {e}; using defaults");
                Config::default()
            }
        }
    } else {
        Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.simulation.sigma, 10.0);
        assert_eq!(cfg.simulation.rho, 28.0);
        assert_eq!(cfg.simulation.beta, 8.0 / 3.0);
        assert_eq!(cfg.simulation.trajectories, 10);
        assert_eq!(cfg.simulation.horizon, 4.0);
        assert_eq!(cfg.simulation.seed, 1);
        assert_eq!(cfg.display.width, 960);
        assert_eq!(cfg.display.height, 720);
        assert_eq!(cfg.display.target_fps, 60);
        assert_eq!(cfg.display.angle, 0.0);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "simulation:\n  rho: 45.0\ndisplay:\n  angle: 120.0\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.simulation.rho, 45.0);
        assert_eq!(cfg.simulation.sigma, 10.0); // default
        assert_eq!(cfg.display.angle, 120.0);
        assert_eq!(cfg.display.width, 960); // default
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
simulation:
  sigma: 16.0
  rho: 45.92
  beta: 4.0
  trajectories: 25
  horizon: 8.0
  seed: 42
display:
  width: 1280
  height: 800
  target_fps: 30
  angle: 240.0
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.simulation.sigma, 16.0);
        assert_eq!(cfg.simulation.rho, 45.92);
        assert_eq!(cfg.simulation.beta, 4.0);
        assert_eq!(cfg.simulation.trajectories, 25);
        assert_eq!(cfg.simulation.horizon, 8.0);
        assert_eq!(cfg.simulation.seed, 42);
        assert_eq!(cfg.display.width, 1280);
        assert_eq!(cfg.display.height, 800);
        assert_eq!(cfg.display.target_fps, 30);
        assert_eq!(cfg.display.angle, 240.0);
    }

    #[test]
    fn test_load_missing_file() {
        // When no chaotarium.yaml exists, load() should return defaults
        let cfg = load();
        assert_eq!(cfg.simulation.sigma, 10.0);
        assert_eq!(cfg.simulation.trajectories, 10);
    }

    #[test]
    fn test_defaults_match_sim_params() {
        // The YAML defaults and the in-memory parameter defaults must agree.
        let cfg = Config::default();
        let p = crate::state::SimParams::default();
        assert_eq!(cfg.simulation.sigma, p.sigma);
        assert_eq!(cfg.simulation.rho, p.rho);
        assert_eq!(cfg.simulation.beta, p.beta);
        assert_eq!(cfg.simulation.trajectories, p.trajectories);
        assert_eq!(cfg.simulation.horizon, p.horizon);
        assert_eq!(cfg.simulation.seed, p.seed);
        assert_eq!(cfg.display.angle, p.angle);
    }
}
