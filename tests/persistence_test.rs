//! Integration tests for CSV ingestion and the on-disk InfoBase cache.

use std::fs;

use infobase::prelude::*;
use tempfile::TempDir;

const WEATHER: &str = "\
outlook,temperature,humidity,windy,play
sunny,85,85,FALSE,no
sunny,80,90,TRUE,no
overcast,83,86,FALSE,yes
rainy,70,96,FALSE,yes
rainy,68,80,FALSE,yes
rainy,65,70,TRUE,no
overcast,64,65,TRUE,yes
sunny,72,95,FALSE,no
sunny,69,70,FALSE,yes
rainy,75,80,FALSE,yes
sunny,75,70,TRUE,yes
overcast,72,90,TRUE,yes
overcast,81,75,FALSE,yes
rainy,71,91,TRUE,no
";

#[test]
fn test_csv_ingestion() -> Result<()> {
    let dataset = CsvDatasetReader::new().read_str(WEATHER)?;
    let info_base = InfoBaseBuilder::default().build(&dataset)?;

    assert_eq!(info_base.row_count(), 14);
    assert_eq!(info_base.feature_count(), 4);
    assert_eq!(info_base.label_name(), "play");
    assert_eq!(
        info_base.column_types(),
        vec![
            ColumnType::Nominal,
            ColumnType::Numeric,
            ColumnType::Numeric,
            ColumnType::Nominal,
            ColumnType::Nominal,
        ]
    );

    let default_class = info_base.default_class().unwrap();
    assert_eq!(info_base.lookup_value(default_class)?, "yes");

    // Numeric columns get one selector per distinct value.
    let hot = info_base.lookup_named("temperature", "85")?;
    assert_eq!(info_base.support_count(&[hot])?, 1);

    let sunny = info_base.lookup_named("outlook", "sunny")?;
    let no = info_base.lookup_named("play", "no")?;
    assert_eq!(info_base.support_count(&[sunny])?, 5);
    assert_eq!(info_base.support_count(&[sunny, no])?, 3);

    Ok(())
}

#[test]
fn test_save_and_load() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("weather.infb");

    let dataset = CsvDatasetReader::new().read_str(WEATHER)?;
    let original = InfoBaseBuilder::default().build(&dataset)?;
    original.save(&path)?;
    assert!(fs::metadata(&path)?.len() > 0);

    let loaded = InfoBase::load(&path)?;
    assert_eq!(loaded.stats(), original.stats());
    assert_eq!(loaded.columns(), original.columns());
    assert_eq!(loaded.class_ids(), original.class_ids());
    assert_eq!(loaded.default_class(), original.default_class());

    for (features, label) in dataset.records() {
        let ids = original.convert_labeled(features, label)?;
        assert_eq!(loaded.convert_labeled(features, label)?, ids);
        assert_eq!(loaded.support_count(&ids)?, original.support_count(&ids)?);
    }

    let windy = loaded.lookup_named("windy", "TRUE")?;
    assert_eq!(
        loaded.class_distribution(&[windy])?,
        original.class_distribution(&[windy])?
    );

    Ok(())
}

#[test]
fn test_load_rejects_corrupt_file() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("weather.infb");

    let dataset = CsvDatasetReader::new().read_str(WEATHER)?;
    InfoBaseBuilder::default().build(&dataset)?.save(&path)?;

    let mut bytes = fs::read(&path)?;
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0x5A;
    fs::write(&path, &bytes)?;

    assert!(InfoBase::load(&path).is_err());
    assert!(InfoBase::load(temp_dir.path().join("missing.infb")).is_err());

    Ok(())
}

#[test]
fn test_config_file_and_missing_values() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("ingest.json");
    fs::write(
        &config_path,
        r#"{"skip_missing": true, "missing_symbols": ["?", "NA"], "parallel": true, "shard_rows": 2}"#,
    )?;
    let config = IngestConfig::from_json_file(&config_path)?;

    let csv = "age;color;class\n31;red;x\nNA;blue;y\n45;?;x\n";
    let dataset = CsvDatasetReader::new().with_delimiter(b';').read_str(csv)?;
    let info_base = InfoBaseBuilder::new(config).build(&dataset)?;

    assert!(info_base.lookup_named("age", "NA").unwrap_err().is_unknown_value());
    assert!(info_base.lookup_named("color", "?").unwrap_err().is_unknown_value());
    assert_eq!(info_base.column_types()[0], ColumnType::Numeric);

    let records = info_base.id_records();
    assert_eq!(records.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 2, 2]);

    Ok(())
}

#[test]
fn test_label_column_selection() -> Result<()> {
    let dataset = CsvDatasetReader::new()
        .with_label_column(LabelColumn::Named("outlook".to_string()))
        .read_str(WEATHER)?;
    let info_base = InfoBaseBuilder::default().build(&dataset)?;

    assert_eq!(info_base.label_name(), "outlook");
    assert_eq!(info_base.class_ids().len(), 3);
    assert!(info_base.convert(&["85", "85", "FALSE", "no"]).is_ok());

    Ok(())
}
