use clap::Parser;
use tier_form::config::tier_file::TierFileFormat;
use tier_form::utils::{logger, validation::{validate_path, Validate}};
use tier_form::{
    available_units, validate_otp_form, validate_tiers, CliConfig, Command, DurationUnit,
    FormConfig, OtpConfig, OtpRules, OtpSubmission, Result, TierError, TierFile, TierSource,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting tier-form CLI");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.config.as_deref().map(load_form_config).transpose() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let result = match cli.command {
        Command::Validate { file, format, json } => {
            run_validate(file.as_deref(), format, json, config.as_ref())
        }
        Command::Units { after } => {
            print_units(after);
            Ok(())
        }
        Command::VerifyOtp {
            phone,
            code,
            country_code,
        } => {
            let rules = config.map(|c| c.otp).unwrap_or_default();
            run_verify_otp(phone, code, country_code, &rules)
        }
    };

    if let Err(e) = result {
        exit_with(&e);
    }

    Ok(())
}

fn load_form_config(path: &str) -> Result<FormConfig> {
    tracing::info!("📁 Loading configuration from: {}", path);
    validate_path("config", path)?;
    let config = FormConfig::from_file(path)?;
    config.validate()?;
    tracing::info!("✅ Configuration '{}' loaded and validated", config.form.name);
    Ok(config)
}

fn run_validate(
    file: Option<&str>,
    format: Option<TierFileFormat>,
    json: bool,
    config: Option<&FormConfig>,
) -> Result<()> {
    let tiers = match (file, config) {
        (Some(path), _) => {
            validate_path("file", path)?;
            let source = match format {
                Some(format) => TierFile::with_format(path, format),
                None => TierFile::new(path)?,
            };
            source.load_tiers()?
        }
        (None, Some(config)) => config.load_tiers()?,
        (None, None) => {
            return Err(TierError::InvalidConfigValueError {
                field: "file".to_string(),
                value: String::new(),
                reason: "Pass a tier file or --config with [[tiers]]".to_string(),
            })
        }
    };

    if tiers.is_empty() {
        return Err(TierError::InvalidConfigValueError {
            field: "tiers".to_string(),
            value: String::new(),
            reason: "The tier file defines no tiers".to_string(),
        });
    }

    let report = validate_tiers(&tiers);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (index, tier) in tiers.iter().enumerate() {
            println!("tiers.{}: {} {} @ {}", index, tier.duration, tier.unit, tier.cost);
        }
        for issue in report.issues() {
            println!("❌ {}", issue);
        }
        for advisory in report.advisories() {
            println!("⚠️  {}", advisory);
        }
    }

    if report.is_valid() {
        tracing::info!("✅ {} tier(s) are valid", tiers.len());
        if !json {
            println!("✅ All {} tier(s) are valid", tiers.len());
        }
        Ok(())
    } else {
        Err(TierError::InvalidTiers { report })
    }
}

fn print_units(after: Option<DurationUnit>) {
    let units: Vec<&str> = available_units(after).iter().map(|u| u.as_str()).collect();
    println!("{}", units.join(","));
}

fn run_verify_otp(
    phone: String,
    code: String,
    country_code: Option<String>,
    rules: &OtpConfig,
) -> Result<()> {
    let submission = OtpSubmission {
        country_code: country_code.unwrap_or_else(|| rules.country_code().to_string()),
        phone_number: phone,
        code,
    };

    let report = validate_otp_form(&submission, rules);
    if report.is_valid() {
        println!("✅ OTP form for {} {} is valid", submission.country_code, submission.phone_number);
        return Ok(());
    }

    for issue in report.issues() {
        println!("❌ {:?}: {}", issue.field(), issue);
    }
    Err(TierError::InvalidOtp { report })
}

fn exit_with(e: &TierError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}
