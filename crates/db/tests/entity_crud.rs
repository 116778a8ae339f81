//! Repository-level tests for manufacturers, engines, and aircraft.
//!
//! Covers classification on every write path, uniqueness violations,
//! cascade behaviour, and the list filter/search/ordering queries.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use mosaic_core::choices::{EngineType, FuelType};
use mosaic_db::models::aircraft::{AircraftFilter, AircraftInput, AircraftPatch};
use mosaic_db::models::engine::{EngineFilter, EngineInput};
use mosaic_db::models::manufacturer::{ManufacturerFilter, ManufacturerInput};
use mosaic_db::repositories::{AircraftRepo, EngineRepo, ManufacturerRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

fn new_manufacturer(name: &str) -> ManufacturerInput {
    ManufacturerInput {
        name: name.to_string(),
        logo: None,
        is_currently_manufacturing: true,
    }
}

fn new_engine(manufacturer: &str, model: &str, horsepower: i32) -> EngineInput {
    EngineInput {
        manufacturer: manufacturer.to_string(),
        model: model.to_string(),
        horsepower,
        displacement_liters: None,
        fuel_type: FuelType::Avgas,
        engine_type: EngineType::Piston,
        is_fuel_injected: false,
    }
}

fn new_aircraft(manufacturer_id: i64, model: &str, stall: &str) -> AircraftInput {
    AircraftInput {
        manufacturer_id,
        model: model.to_string(),
        clean_stall_speed: dec(stall),
        top_speed: dec("120"),
        maneuvering_speed: dec("95"),
        cruise_speed: None,
        vx_speed: None,
        vy_speed: None,
        vs0_speed: None,
        vg_speed: None,
        vfe_speed: None,
        vno_speed: None,
        vne_speed: None,
        vlo_speed: None,
        vle_speed: None,
        max_takeoff_weight: Some(1600),
        seating_capacity: 2,
        retractable_gear: false,
        variable_pitch_prop: false,
        certification_date: None,
        verification_source: String::new(),
        image: None,
        engine_ids: None,
    }
}

fn unique_violation(err: &sqlx::Error) -> Option<String> {
    let db_err = err.as_database_error()?;
    (db_err.code().as_deref() == Some("23505")).then(|| db_err.constraint().unwrap_or("").to_string())
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_classifies_from_stall_speed(pool: PgPool) {
    let mfr = ManufacturerRepo::create(&pool, &new_manufacturer("Cessna")).await.unwrap();

    for (model, stall, sport, mosaic) in [
        ("A", "0", true, true),
        ("B", "47", true, true),
        ("C", "59", true, true),
        ("D", "59.1", false, true),
        ("E", "60", false, true),
        ("F", "61", false, true),
    ] {
        let aircraft = AircraftRepo::create(&pool, &new_aircraft(mfr.id, model, stall))
            .await
            .unwrap();
        assert_eq!(aircraft.sport_pilot_eligible, sport, "stall {stall}");
        assert_eq!(aircraft.is_mosaic_compliant, mosaic, "stall {stall}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_patch_reclassify(pool: PgPool) {
    let mfr = ManufacturerRepo::create(&pool, &new_manufacturer("Piper")).await.unwrap();
    let aircraft = AircraftRepo::create(&pool, &new_aircraft(mfr.id, "Cub", "40"))
        .await
        .unwrap();
    assert!(aircraft.sport_pilot_eligible);

    let mut input = AircraftInput::from_row(&aircraft);
    input.clean_stall_speed = dec("60.5");
    let updated = AircraftRepo::update(&pool, aircraft.id, &input)
        .await
        .unwrap()
        .unwrap();
    assert!(!updated.sport_pilot_eligible);
    assert!(updated.is_mosaic_compliant);

    let patch = AircraftPatch {
        clean_stall_speed: Some(dec("52")),
        ..Default::default()
    };
    let patched = AircraftRepo::update(&pool, aircraft.id, &patch.merge(&updated))
        .await
        .unwrap()
        .unwrap();
    assert!(patched.sport_pilot_eligible);
    assert_eq!(patched.model, "Cub");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resave_is_idempotent(pool: PgPool) {
    let mfr = ManufacturerRepo::create(&pool, &new_manufacturer("Aeronca")).await.unwrap();
    let aircraft = AircraftRepo::create(&pool, &new_aircraft(mfr.id, "Champ", "38"))
        .await
        .unwrap();

    let resaved = AircraftRepo::update(&pool, aircraft.id, &AircraftInput::from_row(&aircraft))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resaved.sport_pilot_eligible, aircraft.sport_pilot_eligible);
    assert_eq!(resaved.is_mosaic_compliant, aircraft.is_mosaic_compliant);
    assert_eq!(resaved.clean_stall_speed, aircraft.clean_stall_speed);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_aircraft_returns_none(pool: PgPool) {
    let mfr = ManufacturerRepo::create(&pool, &new_manufacturer("Maule")).await.unwrap();
    let result = AircraftRepo::update(&pool, 999_999, &new_aircraft(mfr.id, "M-7", "40"))
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Uniqueness and cascades
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_constraints(pool: PgPool) {
    let mfr = ManufacturerRepo::create(&pool, &new_manufacturer("Mooney")).await.unwrap();
    let err = ManufacturerRepo::create(&pool, &new_manufacturer("Mooney")).await.unwrap_err();
    assert_eq!(unique_violation(&err).as_deref(), Some("uq_manufacturers_name"));

    EngineRepo::create(&pool, &new_engine("Lycoming", "O-360", 180)).await.unwrap();
    let err = EngineRepo::create(&pool, &new_engine("Lycoming", "O-360", 180))
        .await
        .unwrap_err();
    assert_eq!(
        unique_violation(&err).as_deref(),
        Some("uq_engines_manufacturer_model")
    );

    AircraftRepo::create(&pool, &new_aircraft(mfr.id, "M20C", "57")).await.unwrap();
    let err = AircraftRepo::create(&pool, &new_aircraft(mfr.id, "M20C", "57"))
        .await
        .unwrap_err();
    assert_eq!(
        unique_violation(&err).as_deref(),
        Some("uq_aircraft_manufacturer_model")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_aircraft_keeps_engines(pool: PgPool) {
    let mfr = ManufacturerRepo::create(&pool, &new_manufacturer("Cessna")).await.unwrap();
    let engine = EngineRepo::create(&pool, &new_engine("Continental", "O-200", 100))
        .await
        .unwrap();

    let mut input = new_aircraft(mfr.id, "150", "48");
    input.engine_ids = Some(vec![engine.id]);
    let aircraft = AircraftRepo::create(&pool, &input).await.unwrap();

    let engines = EngineRepo::list_for_aircraft(&pool, &[aircraft.id]).await.unwrap();
    assert_eq!(engines[&aircraft.id].len(), 1);

    assert!(AircraftRepo::delete(&pool, aircraft.id).await.unwrap());
    assert!(EngineRepo::find_by_id(&pool, engine.id).await.unwrap().is_some());
    assert!(!AircraftRepo::delete(&pool, aircraft.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_manufacturer_cascades_to_aircraft(pool: PgPool) {
    let mfr = ManufacturerRepo::create(&pool, &new_manufacturer("Ercoupe")).await.unwrap();
    let aircraft = AircraftRepo::create(&pool, &new_aircraft(mfr.id, "415-C", "48"))
        .await
        .unwrap();

    let with_count = ManufacturerRepo::find_by_id(&pool, mfr.id).await.unwrap().unwrap();
    assert_eq!(with_count.aircraft_count, 1);

    assert!(ManufacturerRepo::delete(&pool, mfr.id).await.unwrap());
    assert!(AircraftRepo::find_by_id(&pool, aircraft.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_engine_set_is_replaced_only_when_given(pool: PgPool) {
    let mfr = ManufacturerRepo::create(&pool, &new_manufacturer("Vans")).await.unwrap();
    let first = EngineRepo::create(&pool, &new_engine("Lycoming", "O-320", 150)).await.unwrap();
    let second = EngineRepo::create(&pool, &new_engine("Lycoming", "O-360", 180)).await.unwrap();

    let mut input = new_aircraft(mfr.id, "RV-6", "49");
    input.engine_ids = Some(vec![first.id]);
    let aircraft = AircraftRepo::create(&pool, &input).await.unwrap();

    // Absent engine list leaves the set untouched.
    AircraftRepo::update(&pool, aircraft.id, &AircraftInput::from_row(&aircraft))
        .await
        .unwrap();
    let engines = EngineRepo::list_for_aircraft(&pool, &[aircraft.id]).await.unwrap();
    assert_eq!(engines[&aircraft.id][0].id, first.id);

    let mut input = AircraftInput::from_row(&aircraft);
    input.engine_ids = Some(vec![second.id, first.id]);
    AircraftRepo::update(&pool, aircraft.id, &input).await.unwrap();
    let engines = EngineRepo::list_for_aircraft(&pool, &[aircraft.id]).await.unwrap();
    assert_eq!(engines[&aircraft.id].len(), 2);

    let mut input = AircraftInput::from_row(&aircraft);
    input.engine_ids = Some(vec![]);
    AircraftRepo::update(&pool, aircraft.id, &input).await.unwrap();
    let engines = EngineRepo::list_for_aircraft(&pool, &[aircraft.id]).await.unwrap();
    assert!(!engines.contains_key(&aircraft.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_engine_ids(pool: PgPool) {
    let engine = EngineRepo::create(&pool, &new_engine("Rotax", "912 ULS", 100)).await.unwrap();
    let missing = EngineRepo::missing_ids(&pool, &[engine.id, 424_242]).await.unwrap();
    assert_eq!(missing, vec![424_242]);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_aircraft_filters_by_eligibility(pool: PgPool) {
    let mfr = ManufacturerRepo::create(&pool, &new_manufacturer("Test Aero")).await.unwrap();
    for (model, stall) in [("Slow", "47"), ("Edge", "59.5"), ("Sixty", "60"), ("Limit", "61")] {
        AircraftRepo::create(&pool, &new_aircraft(mfr.id, model, stall)).await.unwrap();
    }

    let sport = AircraftRepo::list(
        &pool,
        &AircraftFilter {
            sport_pilot_eligible: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(
        sport.iter().map(|a| a.model.as_str()).collect::<Vec<_>>(),
        vec!["Slow"]
    );

    let compliant = AircraftRepo::list(
        &pool,
        &AircraftFilter {
            is_mosaic_compliant: Some(true),
            ordering: Some("-clean_stall_speed".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(
        compliant.iter().map(|a| a.model.as_str()).collect::<Vec<_>>(),
        vec!["Limit", "Sixty", "Edge", "Slow"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_aircraft_search_matches_model_or_manufacturer(pool: PgPool) {
    let cessna = ManufacturerRepo::create(&pool, &new_manufacturer("Cessna")).await.unwrap();
    let piper = ManufacturerRepo::create(&pool, &new_manufacturer("Piper")).await.unwrap();
    AircraftRepo::create(&pool, &new_aircraft(cessna.id, "172", "48")).await.unwrap();
    AircraftRepo::create(&pool, &new_aircraft(cessna.id, "150", "48")).await.unwrap();
    AircraftRepo::create(&pool, &new_aircraft(piper.id, "J-3 Cub", "38")).await.unwrap();

    let search = |term: &str| AircraftFilter {
        search: Some(term.to_string()),
        ..Default::default()
    };

    let found = AircraftRepo::list(&pool, &search("cessna 172")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].model, "172");

    let found = AircraftRepo::list(&pool, &search("CUB")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].manufacturer_name, "Piper");

    let found = AircraftRepo::list(&pool, &search("cessna")).await.unwrap();
    assert_eq!(found.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_default_ordering_is_manufacturer_then_model(pool: PgPool) {
    let zenith = ManufacturerRepo::create(&pool, &new_manufacturer("Zenith")).await.unwrap();
    let aviat = ManufacturerRepo::create(&pool, &new_manufacturer("Aviat")).await.unwrap();
    AircraftRepo::create(&pool, &new_aircraft(zenith.id, "CH 750", "40")).await.unwrap();
    AircraftRepo::create(&pool, &new_aircraft(aviat.id, "Husky", "46")).await.unwrap();
    AircraftRepo::create(&pool, &new_aircraft(aviat.id, "Eagle", "40")).await.unwrap();

    let all = AircraftRepo::list(&pool, &AircraftFilter::default()).await.unwrap();
    let names: Vec<String> = all.iter().map(|a| a.display_name()).collect();
    assert_eq!(names, vec!["Aviat Eagle", "Aviat Husky", "Zenith CH 750"]);

    let all = AircraftRepo::list(
        &pool,
        &AircraftFilter {
            ordering: Some("bogus".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(all[0].display_name(), "Aviat Eagle");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_manufacturer_and_engine_lists(pool: PgPool) {
    ManufacturerRepo::create(&pool, &new_manufacturer("Piper")).await.unwrap();
    let mut defunct = new_manufacturer("Ercoupe");
    defunct.is_currently_manufacturing = false;
    ManufacturerRepo::create(&pool, &defunct).await.unwrap();

    let active = ManufacturerRepo::list(
        &pool,
        &ManufacturerFilter {
            is_currently_manufacturing: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Piper");

    let mut rotax = new_engine("Rotax", "912 iS", 100);
    rotax.is_fuel_injected = true;
    rotax.fuel_type = FuelType::Mogas;
    EngineRepo::create(&pool, &rotax).await.unwrap();
    EngineRepo::create(&pool, &new_engine("Lycoming", "O-235", 115)).await.unwrap();

    let injected = EngineRepo::list(
        &pool,
        &EngineFilter {
            is_fuel_injected: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(injected.len(), 1);
    assert_eq!(injected[0].fuel_type, FuelType::Mogas);

    let by_power = EngineRepo::list(
        &pool,
        &EngineFilter {
            ordering: Some("-horsepower".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_power[0].horsepower, 115);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_compare_skips_unknown_ids_and_keeps_order(pool: PgPool) {
    let mfr = ManufacturerRepo::create(&pool, &new_manufacturer("Tecnam")).await.unwrap();
    let a = AircraftRepo::create(&pool, &new_aircraft(mfr.id, "P92", "39")).await.unwrap();
    let b = AircraftRepo::create(&pool, &new_aircraft(mfr.id, "P2008", "41")).await.unwrap();

    let details = AircraftRepo::compare(&pool, &[b.id, 999_999, a.id]).await.unwrap();
    let ids: Vec<i64> = details.iter().map(|d| d.aircraft.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
    assert_eq!(details[0].manufacturer.aircraft_count, 2);

    assert!(AircraftRepo::compare(&pool, &[999_999]).await.unwrap().is_empty());
}
