//! Raw episode records as delivered by the data-fetch collaborator
//!
//! Field names follow the upstream table columns.

use serde::{Deserialize, Serialize};

/// Discharge weekday as stored upstream: either 1..7 or a day name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawWeekday {
    Number(i64),
    Name(String),
}

/// One hospitalization row before normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEpisode {
    /// Patient name
    #[serde(default)]
    pub nome: Option<String>,
    /// National health-card number
    #[serde(default)]
    pub cns: Option<String>,
    /// Admission date, `YYYY-MM-DD`
    #[serde(default)]
    pub data_admissao: Option<String>,
    /// Discharge date, `YYYY-MM-DD`; absent while the patient is admitted
    #[serde(default)]
    pub data_alta: Option<String>,
    /// Length of stay in days, when the source system supplies it
    #[serde(default)]
    pub dias_internacao: Option<f64>,
    #[serde(default)]
    pub dia_semana_alta: Option<RawWeekday>,
}

impl RawEpisode {
    /// Create a record with a name and admission date
    #[must_use]
    pub fn new(nome: &str, data_admissao: &str) -> Self {
        Self {
            nome: Some(nome.to_string()),
            data_admissao: Some(data_admissao.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cns(mut self, cns: &str) -> Self {
        self.cns = Some(cns.to_string());
        self
    }

    #[must_use]
    pub fn with_discharge(mut self, data_alta: &str) -> Self {
        self.data_alta = Some(data_alta.to_string());
        self
    }

    #[must_use]
    pub fn with_length_of_stay(mut self, days: f64) -> Self {
        self.dias_internacao = Some(days);
        self
    }

    #[must_use]
    pub fn with_discharge_weekday(mut self, weekday: RawWeekday) -> Self {
        self.dia_semana_alta = Some(weekday);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_upstream_shape() {
        let json = r#"[
            {"nome": "Maria", "cns": "700 0000 0000 0001", "data_admissao": "2024-01-02",
             "data_alta": "2024-01-05", "dias_internacao": 3, "dia_semana_alta": "Sexta-feira"},
            {"nome": "João", "data_admissao": "2024-01-03", "dia_semana_alta": 5},
            {"nome": "Ana", "data_admissao": "2024-01-04", "data_alta": null}
        ]"#;

        let records: Vec<RawEpisode> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].dias_internacao, Some(3.0));
        assert_eq!(
            records[0].dia_semana_alta,
            Some(RawWeekday::Name("Sexta-feira".to_string()))
        );
        assert_eq!(records[1].cns, None);
        assert_eq!(records[1].dia_semana_alta, Some(RawWeekday::Number(5)));
        assert_eq!(records[2].data_alta, None);
    }
}
