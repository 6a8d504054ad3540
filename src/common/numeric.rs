// src/common/numeric.rs

use chrono::{Datelike, NaiveDate};

/// Arredonda para `places` casas decimais (meio para longe do zero).
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Divisão protegida: `None` quando algum operando falta, o denominador é zero
/// ou o resultado não é finito. Nunca entra em pânico, nunca devolve inf/NaN.
pub fn safe_div(
    numerator: Option<f64>,
    denominator: Option<f64>,
    places: Option<u32>,
) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    if d == 0.0 || !n.is_finite() || !d.is_finite() {
        return None;
    }

    let quotient = n / d;
    if !quotient.is_finite() {
        return None;
    }
    Some(match places {
        Some(p) => round_to(quotient, p),
        None => quotient,
    })
}

/// Ordinal de calendário (dias desde 01/01/0001, que vale 1).
pub fn date_to_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

pub fn ordinal_to_date(ordinal: i64) -> Option<NaiveDate> {
    i32::try_from(ordinal)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
}

/// Data média ponderada: `Σ(ordinal × peso) / Σ(peso)`, considerando apenas pesos
/// positivos, arredondada ao ordinal inteiro mais próximo.
///
/// A conta é feita em inteiros, então o resultado não depende da ordem de entrada.
pub fn weighted_mean_date<I>(entries: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = (NaiveDate, i64)>,
{
    let (weighted_sum, total_weight) = entries
        .into_iter()
        .filter(|(_, weight)| *weight > 0)
        .fold((0i128, 0i128), |(sum, total), (date, weight)| {
            let weight = i128::from(weight);
            (sum + i128::from(date_to_ordinal(date)) * weight, total + weight)
        });

    if total_weight == 0 {
        return None;
    }

    // Arredondamento exato de sum/total (ordinais são sempre positivos)
    let mean = (2 * weighted_sum + total_weight) / (2 * total_weight);
    ordinal_to_date(i64::try_from(mean).ok()?)
}
