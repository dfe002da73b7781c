// Tests focusing on the algorithm catalog
use pqc_engine::{Error, Result, registry};

#[test]
fn test_catalog_is_populated() {
    // A default engine build ships algorithms for both families
    assert!(registry::kem_count() > 0);
    assert!(registry::sig_count() > 0);
    assert!(!registry::enabled_kems().is_empty());
    assert!(!registry::enabled_sigs().is_empty());
}

#[test]
fn test_enabled_is_subset_of_supported() {
    let supported = registry::supported_kems();
    for name in registry::enabled_kems() {
        assert!(supported.contains(&name), "{} enabled but not supported", name);
    }

    let supported = registry::supported_sigs();
    for name in registry::enabled_sigs() {
        assert!(supported.contains(&name), "{} enabled but not supported", name);
    }
}

#[test]
fn test_enabled_implies_supported() {
    for identity in registry::kem_identities() {
        if registry::is_kem_enabled(&identity.name) {
            assert!(registry::is_kem_supported(&identity.name));
        }
    }
    for identity in registry::sig_identities() {
        if registry::is_sig_enabled(&identity.name) {
            assert!(registry::is_sig_supported(&identity.name));
        }
    }
}

#[test]
fn test_names_follow_catalog_order() -> Result<()> {
    for (index, name) in registry::supported_kems().iter().enumerate() {
        assert_eq!(registry::kem_name(index)?, *name);
    }
    for (index, name) in registry::supported_sigs().iter().enumerate() {
        assert_eq!(registry::sig_name(index)?, *name);
    }
    Ok(())
}

#[test]
fn test_out_of_range_index_rejected() {
    let count = registry::kem_count();
    assert_eq!(registry::kem_name(count), Err(Error::InvalidAlgorithmIndex(count)));

    let count = registry::sig_count();
    assert_eq!(registry::sig_name(count), Err(Error::InvalidAlgorithmIndex(count)));
}

#[test]
fn test_membership_of_unknown_names() {
    assert!(!registry::is_kem_supported("not-a-kem"));
    assert!(!registry::is_kem_enabled("not-a-kem"));
    assert!(!registry::is_sig_supported("not-a-sig"));
    assert!(!registry::is_sig_enabled("not-a-sig"));
}
