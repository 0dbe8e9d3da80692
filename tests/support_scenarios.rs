//! Integration tests for support counting and record conversion on small
//! hand-checked datasets.

use infobase::prelude::*;

fn three_rows() -> Result<InfoBase> {
    let dataset = Dataset::from_strs(&["f0"], "class", &[&["a"], &["b"], &["a"]], &["x", "y", "x"])?;
    InfoBaseBuilder::default().build(&dataset)
}

#[test]
fn test_three_row_support_counts() -> Result<()> {
    let info_base = three_rows()?;

    let a = info_base.convert(&["a"])?[0];
    let x = info_base.lookup_named("class", "x")?;
    let y = info_base.lookup_named("class", "y")?;

    assert_eq!(info_base.nlist(a)?.rows(), &[0, 2]);
    assert_eq!(info_base.support_count(&[a])?, 2);
    assert_eq!(info_base.support_count(&[a, x])?, 2);
    assert_eq!(info_base.support_count(&[a, y])?, 0);
    assert_eq!(info_base.support_nlist(&[a, x])?.rows(), &[0, 2]);
    assert!(info_base.support_nlist(&[a, y])?.is_empty());

    Ok(())
}

#[test]
fn test_ids_follow_first_occurrence() -> Result<()> {
    let info_base = three_rows()?;

    // Row 0 registers (f0=a) and (class=x), row 1 registers the rest.
    let values: Vec<&str> = (0..info_base.selector_count() as SelectorId)
        .map(|id| info_base.lookup_value(id))
        .collect::<Result<_>>()?;
    assert_eq!(values, vec!["a", "x", "b", "y"]);

    Ok(())
}

#[test]
fn test_unregistered_selector_is_not_found() -> Result<()> {
    let info_base = three_rows()?;
    let missing = info_base.selector_count() as SelectorId;

    let err = info_base.support_count(&[missing]).unwrap_err();
    assert!(err.is_not_found());

    // A bad ID anywhere in the query fails the whole query.
    let a = info_base.convert(&["a"])?[0];
    let y = info_base.lookup_named("class", "y")?;
    assert!(info_base.support_count(&[a, y, missing]).unwrap_err().is_not_found());
    assert!(info_base.class_distribution(&[missing]).unwrap_err().is_not_found());

    Ok(())
}

#[test]
fn test_unknown_value_on_convert() -> Result<()> {
    let info_base = three_rows()?;

    let err = info_base.convert(&["c"]).unwrap_err();
    assert!(err.is_unknown_value());
    assert!(matches!(
        err,
        InfoBaseError::UnknownValue { feature: 0, ref value } if value == "c"
    ));

    assert_eq!(info_base.convert_partial(&["c"])?, vec![None]);

    Ok(())
}

#[test]
fn test_invalid_inputs() -> Result<()> {
    let info_base = three_rows()?;

    assert!(info_base.support_count(&[]).unwrap_err().is_invalid_input());
    assert!(info_base.convert(&["a", "b"]).unwrap_err().is_invalid_input());
    assert!(info_base.convert::<&str>(&[]).unwrap_err().is_invalid_input());

    let err = Dataset::from_strs(&["f0"], "class", &[&["a"], &["b"]], &["x"]).unwrap_err();
    assert!(err.is_invalid_input());

    Ok(())
}

#[test]
fn test_duplicate_selectors_in_query() -> Result<()> {
    let info_base = three_rows()?;
    let a = info_base.convert(&["a"])?[0];
    let x = info_base.lookup_named("class", "x")?;

    assert_eq!(info_base.support_count(&[a, a])?, 2);
    assert_eq!(info_base.support_count(&[a, x, a, x])?, 2);

    Ok(())
}

#[test]
fn test_class_distribution() -> Result<()> {
    let dataset = Dataset::from_strs(
        &["outlook", "windy"],
        "play",
        &[
            &["sunny", "false"],
            &["sunny", "true"],
            &["overcast", "false"],
            &["rainy", "false"],
            &["rainy", "true"],
            &["sunny", "false"],
        ],
        &["no", "no", "yes", "yes", "no", "yes"],
    )?;
    let info_base = InfoBaseBuilder::default().build(&dataset)?;

    let sunny = info_base.lookup_named("outlook", "sunny")?;
    let distribution = info_base.class_distribution(&[sunny])?;
    let counts: Vec<(&str, usize)> = distribution
        .iter()
        .map(|support| -> Result<(&str, usize)> {
            Ok((info_base.lookup_value(support.class_id)?, support.count))
        })
        .collect::<Result<_>>()?;
    assert_eq!(counts, vec![("no", 2), ("yes", 1)]);

    let total: usize = distribution.iter().map(|support| support.count).sum();
    assert_eq!(total, info_base.support_count(&[sunny])?);

    let labeled = info_base.convert_labeled(&["sunny", "false"], "yes")?;
    assert_eq!(info_base.support_count(&labeled)?, 1);

    Ok(())
}
