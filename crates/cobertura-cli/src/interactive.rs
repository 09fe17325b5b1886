use anyhow::Result;
use cobertura_pipeline::{CoverageFilter, CoverageSession};
use dialoguer::{Password, Select};

const ALL_PROVINCES: &str = "All provinces";
const ALL_LOCALITIES: &str = "All localities";
const ALL_SPECIALTIES: &str = "All specialties";

/// Interactive province, locality and specialty selection from the loaded data
pub fn interactive_filter(session: &CoverageSession) -> Result<CoverageFilter> {
    eprintln!("\n🗺  Coverage filter\n");

    let mut filter = CoverageFilter::new();

    let provinces = session.provinces();
    if let Some(province) = pick("Province", ALL_PROVINCES, &provinces)? {
        let localities = session.localities(Some(province.as_str()));
        filter = filter.with_province(province);

        if let Some(locality) = pick("Locality", ALL_LOCALITIES, &localities)? {
            filter = filter.with_locality(locality);
        }
    }

    let specialties = session.specialties();
    if let Some(specialty) = pick("Provider specialty", ALL_SPECIALTIES, &specialties)? {
        filter = filter.with_specialty(specialty);
    }

    Ok(filter)
}

/// Select one option, or `None` for the leading "all" entry
fn pick(prompt: &str, all: &str, options: &[String]) -> Result<Option<String>> {
    if options.is_empty() {
        return Ok(None);
    }

    let mut items = Vec::with_capacity(options.len() + 1);
    items.push(all);
    items.extend(options.iter().map(String::as_str));

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;
    let chosen = selection.checked_sub(1).and_then(|idx| options.get(idx));
    Ok(chosen.cloned())
}

/// Hidden prompt for the developer key
pub fn prompt_dev_key() -> Result<String> {
    let key = Password::new()
        .with_prompt("Developer key")
        .allow_empty_password(true)
        .interact()?;
    Ok(key)
}
