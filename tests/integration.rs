// Integration tests for COINS validator components
// These tests drive the registry and the CLI executor together

#[cfg(test)]
use coins_cli::commands::{CommandExecutor, Commands, GlobalOptions, OutputFormat};
#[cfg(test)]
use coins_validator::{registry, ProfileError, ProfileRegistry, RegistryConfig};
#[cfg(test)]
use std::fs;

#[test]
fn test_end_to_end_site_profile_lookup() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("bridges.profile"),
        r#"ProfileName "Bridges"
ProfileAuthor "Rijkswaterstaat"

<ProfileCheck>
Reference "PC1"
Description "Container imports the bridge library"
ResultFormat "boolean"
<SparqlQuery>
ASK { ?o <http://www.w3.org/2002/07/owl#imports> <http://example.org/bridges.rdf> }
</SparqlQuery>
</ProfileCheck>

<ValidationRule>
Reference "B1"
Description "Every bridge has a span"
ResultFormat "Bridge {{bridge}} has no span"
<SparqlQuery>
PREFIX ex: <http://example.org/bridges.rdf#>
SELECT ?bridge WHERE {
  ?bridge a ex:Bridge .
  FILTER NOT EXISTS { ?bridge ex:span ?span }
}
</SparqlQuery>
</ValidationRule>
"#,
    )
    .unwrap();

    let options = GlobalOptions {
        profile_dirs: vec![dir.path().to_path_buf()],
        ..GlobalOptions::default()
    };
    let executor = CommandExecutor::from_options(&options).unwrap();

    let listed = executor.execute(Commands::List { format: OutputFormat::Text }).unwrap();
    assert_eq!(listed.message, "Bridges\nCOINS 2.0 Lite\nCOINS 2.0 Lite Extended");

    let shown = executor
        .execute(Commands::Show { name: "Bridges".to_string(), format: OutputFormat::Json })
        .unwrap();
    assert!(shown.success);
    let data = shown.data.unwrap();
    assert_eq!(data["author"], "Rijkswaterstaat");
    assert_eq!(data["validation_rules"][0]["reference"], "B1");
    assert_eq!(
        data["validation_rules"][0]["query"],
        "PREFIX ex: <http://example.org/bridges.rdf#>\nSELECT ?bridge WHERE {\n?bridge a ex:Bridge .\nFILTER NOT EXISTS { ?bridge ex:span ?span }\n}\n"
    );
}

#[test]
fn test_runtime_registration_visible_to_executor() {
    let registry = ProfileRegistry::new(RegistryConfig::default());
    registry
        .register("ProfileName \"User Supplied\"\n<DataInference>\nReference D1\n</DataInference>\n".as_bytes())
        .unwrap();

    let executor = CommandExecutor::new(registry);
    let shown = executor
        .execute(Commands::Show { name: "User Supplied".to_string(), format: OutputFormat::Text })
        .unwrap();
    assert!(shown.success);
    assert!(shown.message.contains("Data inferences: 1"));
    assert_eq!(executor.registry().len(), 3);
}

#[test]
fn test_global_registry_register_and_select() {
    let global = registry::global();
    assert!(matches!(
        global.select("Integration Global"),
        Err(ProfileError::NotFound(_))
    ));

    let registered = global
        .register("ProfileName \"Integration Global\"\nProfileAuthor Tests\n".as_bytes())
        .unwrap();
    let selected = global.select("Integration Global").unwrap();
    assert_eq!(selected, registered);
    assert!(global.contains("COINS 2.0 Lite"));
}

#[test]
fn test_failed_registration_reports_invalid_profile() {
    let registry = ProfileRegistry::default();
    let before = registry.list();

    let err = registry
        .register("<ValidationRule>\nReference V1\n</ValidationRule>\n".as_bytes())
        .unwrap_err();
    assert!(err.is_invalid_profile());
    assert_eq!(registry.list(), before);
}
