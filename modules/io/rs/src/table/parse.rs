use eyre::{eyre, OptionExt, Result, WrapErr};

use ligamap_core_rs::loc::Strand;

pub fn field<'a>(fields: &[&'a str], ind: usize, name: &str) -> Result<&'a str> {
    let value = fields
        .get(ind)
        .ok_or_else(|| eyre!("Missing {name} (column {ind})"))?
        .trim();
    if value.is_empty() {
        return Err(eyre!("Empty {name} (column {ind})"));
    }
    Ok(value)
}

pub fn text(fields: &[&str], ind: usize, name: &str) -> Result<String> {
    Ok(field(fields, ind, name)?.to_owned())
}

pub fn coordinate(fields: &[&str], ind: usize, name: &str) -> Result<i64> {
    field(fields, ind, name)?
        .parse::<i64>()
        .wrap_err_with(|| format!("Invalid {name}"))
}

pub fn count(fields: &[&str], ind: usize, name: &str) -> Result<u64> {
    let value = field(fields, ind, name)?;
    // Aggregated counts are occasionally written as floats, e.g. "12.0"
    match value.parse::<u64>() {
        Ok(count) => Ok(count),
        Err(_) => value
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite() && *x >= 0.0 && x.fract() == 0.0)
            .map(|x| x as u64)
            .ok_or_eyre(format!("Invalid {name}: {value:?}")),
    }
}

pub fn weight(fields: &[&str], ind: usize, name: &str) -> Result<f64> {
    let value = field(fields, ind, name)?
        .parse::<f64>()
        .wrap_err_with(|| format!("Invalid {name}"))?;
    if value.is_nan() {
        return Err(eyre!("{name} is NaN"));
    }
    Ok(value)
}

pub fn strand(fields: &[&str], ind: usize) -> Result<Strand> {
    field(fields, ind, "strand")?.parse()
}
