#[cfg(test)]
mod test_settings {
    use std::io::BufReader;

    use saxskit_io::{ExvModel, RunConfig, Settings};

    const SAMPLE: &str = "\
# run configuration
general::threads 8
axes::qmin 0.01
axes::qmax 0.4     # upper cutoff
exv::model grid
hydrate::enabled false
fit::exv true
general::output results/
";

    fn sample() -> Settings {
        Settings::from_reader(BufReader::new(SAMPLE.as_bytes())).unwrap()
    }

    #[test]
    fn values_parse_by_target_type() {
        let settings = sample();
        assert_eq!(settings.get::<usize>("general::threads"), Some(8));
        assert_eq!(settings.get::<f64>("axes::qmin"), Some(0.01));
        assert_eq!(settings.get::<bool>("hydrate::enabled"), Some(false));
        assert_eq!(settings.get_str("general::output"), Some("results/"));
    }

    #[test]
    fn inline_comments_are_stripped() {
        let settings = sample();
        assert_eq!(settings.get::<f64>("axes::qmax"), Some(0.4));
    }

    #[test]
    fn missing_keys_yield_none() {
        let settings = sample();
        assert_eq!(settings.get::<usize>("general::missing"), None);
    }

    #[test]
    fn unparsable_values_yield_none() {
        let text = "general::threads many\n";
        let settings = Settings::from_reader(BufReader::new(text.as_bytes())).unwrap();
        assert_eq!(settings.get::<usize>("general::threads"), None);
    }

    #[test]
    fn keys_without_namespace_are_rejected() {
        let text = "threads 8\n";
        assert!(Settings::from_reader(BufReader::new(text.as_bytes())).is_err());
    }

    #[test]
    fn run_config_overlays_the_defaults() {
        let config = RunConfig::from_settings(&sample());
        assert_eq!(config.threads, 8);
        assert_eq!(config.qmin, 0.01);
        assert_eq!(config.qmax, 0.4);
        assert_eq!(config.exv_model, ExvModel::Grid);
        assert!(!config.hydrate);
        assert!(config.fit_exv);
        // untouched settings keep their defaults
        assert!(config.fit_hydration);
        assert_eq!(config.output.as_deref(), Some("results/"));
    }

    #[test]
    fn exv_model_names_parse() {
        assert_eq!("plain".parse::<ExvModel>().unwrap(), ExvModel::Plain);
        assert_eq!("avg".parse::<ExvModel>().unwrap(), ExvModel::Average);
        assert_eq!("grid-surface".parse::<ExvModel>().unwrap(), ExvModel::GridSurface);
        assert!("quantum".parse::<ExvModel>().is_err());
    }
}
