//! Integration tests for the CSV record source

use cobertura_core::error::CoberturaError;
use cobertura_core::models::{FacilityType, RawCoordinate};
use cobertura_source::{CsvSource, RecordSource};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    bytes_file(contents.as_bytes())
}

fn bytes_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file
}

fn path(file: &NamedTempFile) -> PathBuf {
    file.path().to_path_buf()
}

#[tokio::test]
async fn test_load_spanish_headers() {
    let members = csv_file(
        "ID_AFILIADO,CALLE,NÚMERO,LOCALIDAD,PROVINCIA,LATITUD,LONGITUD\n\
         1,San Martin,100,Rosario,Santa Fe,-32.95,-60.65\n\
         2,Belgrano,,Rosario,Santa Fe,,\n",
    );
    let providers = csv_file(
        "ID_PRESTADOR,NOMBRE,LOCALIDAD,PROVINCIA,PAIS,LATITUD,LONGITUD,ESPECIALIDAD,TIPO\n\
         P1,Clinica Norte,Rosario,Santa Fe,Argentina,-32.94,-60.64,Cardiologia,Consultorio\n\
         F1,Farmacia Sur,Rosario,Santa Fe,Argentina,-32.96,-60.66,,Farmacia\n",
    );

    let source = CsvSource::new(vec![path(&members)], vec![path(&providers)]);
    let records = source.load().await.unwrap();

    assert_eq!(records.members.len(), 2);
    let first = &records.members[0];
    assert_eq!(first.member_id, "1");
    assert_eq!(first.number, "100");
    assert_eq!(first.latitude, Some(RawCoordinate::text("-32.95")));
    assert_eq!(first.country, None);

    let second = &records.members[1];
    assert_eq!(second.number, "");
    assert_eq!(second.latitude, Some(RawCoordinate::text("")));

    assert_eq!(records.providers.len(), 2);
    assert_eq!(
        records.providers[0].specialty.as_deref(),
        Some("Cardiologia")
    );
    assert_eq!(records.providers[0].facility_type, FacilityType::Clinic);
    assert_eq!(records.providers[0].country.as_deref(), Some("Argentina"));
    assert_eq!(records.providers[1].specialty, None);
    assert_eq!(records.providers[1].facility_type, FacilityType::Pharmacy);
}

#[tokio::test]
async fn test_multi_part_sources_are_concatenated() {
    let north = csv_file("member_id,latitude,longitude\nA,-24.8,-65.4\n");
    let south = csv_file("member_id,latitude,longitude\nB,-54.8,-68.3\nC,-41.1,-71.3\n");
    let providers = csv_file("provider_id,latitude,longitude\nP1,-34.6,-58.4\n");

    let source = CsvSource::new(vec![path(&north), path(&south)], vec![path(&providers)]);
    let records = source.load().await.unwrap();

    let ids: Vec<&str> = records
        .members
        .iter()
        .map(|m| m.member_id.as_str())
        .collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_semicolon_delimiter() {
    let members = csv_file("ID_AFILIADO;LATITUD;LONGITUD\n7;-34,60;-58,38\n");
    let providers = csv_file("ID_PRESTADOR;LATITUD;LONGITUD\nP;-34,61;-58,39\n");

    let source = CsvSource::new(vec![path(&members)], vec![path(&providers)])
        .with_delimiter(b';');
    let records = source.load().await.unwrap();

    assert_eq!(
        records.members[0].latitude,
        Some(RawCoordinate::text("-34,60"))
    );
    assert_eq!(
        records.providers[0].longitude,
        Some(RawCoordinate::text("-58,39"))
    );
}

#[tokio::test]
async fn test_latin1_rows_are_decoded() {
    let members = bytes_file(
        b"ID_AFILIADO,N\xdaMERO,LOCALIDAD,PROVINCIA,LATITUD,LONGITUD\n\
          1,12,C\xf3rdoba,C\xf3rdoba,-31.42,-64.18\n\
          2,7,Ca\xf1uelas,Buenos Aires,-35.05,-58.76\n",
    );
    let providers = csv_file("ID_PRESTADOR,LOCALIDAD\nP,Córdoba\n");

    let source = CsvSource::new(vec![path(&members)], vec![path(&providers)]);
    let records = source.load().await.unwrap();

    assert_eq!(records.members.len(), 2);
    assert_eq!(records.members[0].locality, "Córdoba");
    assert_eq!(records.members[0].number, "12");
    assert_eq!(records.members[1].locality, "Cañuelas");
    assert_eq!(records.providers[0].locality, "Córdoba");
}

#[tokio::test]
async fn test_missing_coordinate_columns_read_as_absent() {
    let members = csv_file("ID_AFILIADO,LOCALIDAD\n1,Salta\n");
    let providers = csv_file("ID_PRESTADOR,LOCALIDAD\nP,Salta\n");

    let source = CsvSource::new(vec![path(&members)], vec![path(&providers)]);
    let records = source.load().await.unwrap();

    assert_eq!(records.members[0].latitude, None);
    assert_eq!(records.members[0].longitude, None);
    assert_eq!(records.members[0].locality, "Salta");
}

#[tokio::test]
async fn test_missing_identifier_column_is_fatal() {
    let members = csv_file("CALLE,LATITUD,LONGITUD\nMitre,-34.6,-58.4\n");
    let providers = csv_file("provider_id\nP\n");

    let source = CsvSource::new(vec![path(&members)], vec![path(&providers)]);
    let err = source.load().await.unwrap_err();

    assert!(matches!(
        err,
        CoberturaError::MissingColumn { ref column, .. } if column == "member_id"
    ));
}

#[tokio::test]
async fn test_missing_file_is_source_not_found() {
    let providers = csv_file("provider_id\nP\n");
    let source = CsvSource::new(
        vec![PathBuf::from("/nonexistent/afiliados.csv")],
        vec![path(&providers)],
    );

    let err = source.load().await.unwrap_err();
    assert!(matches!(err, CoberturaError::SourceNotFound { .. }));
}

#[test]
fn test_no_provider_files_configured() {
    let members = csv_file("member_id\n1\n");
    let source = CsvSource::new(vec![path(&members)], Vec::new());

    let err = source.read_all().unwrap_err();
    assert!(matches!(
        err,
        CoberturaError::SourceMissing { ref population } if population == "provider"
    ));
}
