//! Editable form state and its normalization into a prediction request.

use crate::{
    domain::{
        Contract, FieldName, Gender, InternetAddon, InternetService, MultipleLines, PaymentMethod,
        YesNo,
    },
    error::{FormError, UnknownOption},
    protocol::PredictionRequest,
};

/// Current values of every form field. Numeric fields stay as the raw text
/// the user typed until [`FormInput::normalize`] coerces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub gender: Gender,
    pub senior_citizen: String,
    pub partner: YesNo,
    pub dependents: YesNo,
    pub tenure: String,
    pub phone_service: YesNo,
    pub multiple_lines: MultipleLines,
    pub internet_service: InternetService,
    pub online_security: InternetAddon,
    pub online_backup: InternetAddon,
    pub device_protection: InternetAddon,
    pub tech_support: InternetAddon,
    pub streaming_tv: InternetAddon,
    pub streaming_movies: InternetAddon,
    pub contract: Contract,
    pub paperless_billing: YesNo,
    pub payment_method: PaymentMethod,
    pub monthly_charges: String,
    pub total_charges: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self::initialize()
    }
}

impl FormInput {
    pub fn initialize() -> Self {
        Self {
            gender: Gender::Female,
            senior_citizen: "0".into(),
            partner: YesNo::No,
            dependents: YesNo::No,
            tenure: "12".into(),
            phone_service: YesNo::Yes,
            multiple_lines: MultipleLines::No,
            internet_service: InternetService::FiberOptic,
            online_security: InternetAddon::No,
            online_backup: InternetAddon::No,
            device_protection: InternetAddon::No,
            tech_support: InternetAddon::No,
            streaming_tv: InternetAddon::No,
            streaming_movies: InternetAddon::No,
            contract: Contract::MonthToMonth,
            paperless_billing: YesNo::Yes,
            payment_method: PaymentMethod::ElectronicCheck,
            monthly_charges: "70.0".into(),
            total_charges: "840.0".into(),
        }
    }

    /// Returns a copy with one field replaced, looked up by its wire name.
    pub fn update(&self, field_name: &str, raw_value: &str) -> Result<Self, FormError> {
        let field = field_name.parse::<FieldName>()?;
        self.with_field(field, raw_value)
    }

    /// Returns a copy with `field` set to `raw_value`. Categorical values must
    /// name one of the field's options; numeric text is kept as typed.
    pub fn with_field(&self, field: FieldName, raw_value: &str) -> Result<Self, FormError> {
        let mut next = self.clone();
        let invalid = |err: UnknownOption| FormError::InvalidOption {
            field,
            value: err.0,
        };

        match field {
            FieldName::Gender => next.gender = raw_value.parse().map_err(invalid)?,
            FieldName::Partner => next.partner = raw_value.parse().map_err(invalid)?,
            FieldName::Dependents => next.dependents = raw_value.parse().map_err(invalid)?,
            FieldName::PhoneService => next.phone_service = raw_value.parse().map_err(invalid)?,
            FieldName::MultipleLines => {
                next.multiple_lines = raw_value.parse().map_err(invalid)?
            }
            FieldName::InternetService => {
                next.internet_service = raw_value.parse().map_err(invalid)?
            }
            FieldName::OnlineSecurity => {
                next.online_security = raw_value.parse().map_err(invalid)?
            }
            FieldName::OnlineBackup => next.online_backup = raw_value.parse().map_err(invalid)?,
            FieldName::DeviceProtection => {
                next.device_protection = raw_value.parse().map_err(invalid)?
            }
            FieldName::TechSupport => next.tech_support = raw_value.parse().map_err(invalid)?,
            FieldName::StreamingTv => next.streaming_tv = raw_value.parse().map_err(invalid)?,
            FieldName::StreamingMovies => {
                next.streaming_movies = raw_value.parse().map_err(invalid)?
            }
            FieldName::Contract => next.contract = raw_value.parse().map_err(invalid)?,
            FieldName::PaperlessBilling => {
                next.paperless_billing = raw_value.parse().map_err(invalid)?
            }
            FieldName::PaymentMethod => {
                next.payment_method = raw_value.parse().map_err(invalid)?
            }
            FieldName::SeniorCitizen => next.senior_citizen = raw_value.to_string(),
            FieldName::Tenure => next.tenure = raw_value.to_string(),
            FieldName::MonthlyCharges => next.monthly_charges = raw_value.to_string(),
            FieldName::TotalCharges => next.total_charges = raw_value.to_string(),
        }

        Ok(next)
    }

    /// Current value of `field` as the text a form control would show.
    pub fn value(&self, field: FieldName) -> String {
        match field {
            FieldName::Gender => self.gender.to_string(),
            FieldName::SeniorCitizen => self.senior_citizen.clone(),
            FieldName::Partner => self.partner.to_string(),
            FieldName::Dependents => self.dependents.to_string(),
            FieldName::Tenure => self.tenure.clone(),
            FieldName::PhoneService => self.phone_service.to_string(),
            FieldName::MultipleLines => self.multiple_lines.to_string(),
            FieldName::InternetService => self.internet_service.to_string(),
            FieldName::OnlineSecurity => self.online_security.to_string(),
            FieldName::OnlineBackup => self.online_backup.to_string(),
            FieldName::DeviceProtection => self.device_protection.to_string(),
            FieldName::TechSupport => self.tech_support.to_string(),
            FieldName::StreamingTv => self.streaming_tv.to_string(),
            FieldName::StreamingMovies => self.streaming_movies.to_string(),
            FieldName::Contract => self.contract.to_string(),
            FieldName::PaperlessBilling => self.paperless_billing.to_string(),
            FieldName::PaymentMethod => self.payment_method.to_string(),
            FieldName::MonthlyCharges => self.monthly_charges.clone(),
            FieldName::TotalCharges => self.total_charges.clone(),
        }
    }

    pub fn normalize(&self) -> Result<PredictionRequest, FormError> {
        Ok(PredictionRequest {
            gender: self.gender,
            senior_citizen: parse_integer(FieldName::SeniorCitizen, &self.senior_citizen)?,
            partner: self.partner,
            dependents: self.dependents,
            tenure: parse_integer(FieldName::Tenure, &self.tenure)?,
            phone_service: self.phone_service,
            multiple_lines: self.multiple_lines,
            internet_service: self.internet_service,
            online_security: self.online_security,
            online_backup: self.online_backup,
            device_protection: self.device_protection,
            tech_support: self.tech_support,
            streaming_tv: self.streaming_tv,
            streaming_movies: self.streaming_movies,
            contract: self.contract,
            paperless_billing: self.paperless_billing,
            payment_method: self.payment_method,
            monthly_charges: parse_decimal(FieldName::MonthlyCharges, &self.monthly_charges)?,
            total_charges: parse_decimal(FieldName::TotalCharges, &self.total_charges)?,
        })
    }
}

fn parse_integer(field: FieldName, raw: &str) -> Result<i64, FormError> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }
    // Number inputs may hand back "24.0" for whole values. `as` saturates, so
    // anything outside the i64 range is rejected before the cast.
    match trimmed.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value.fract() == 0.0
                && value >= i64::MIN as f64
                && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(FormError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

fn parse_decimal(field: FieldName, raw: &str) -> Result<f64, FormError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_populates_every_field() {
        let form = FormInput::initialize();
        for field in FieldName::ALL {
            assert!(!form.value(field).is_empty(), "{field} left empty");
        }
        assert_eq!(form.contract, Contract::MonthToMonth);
        assert_eq!(form.internet_service, InternetService::FiberOptic);
        assert_eq!(form.tenure, "12");
    }

    #[test]
    fn update_changes_only_the_named_field() {
        let form = FormInput::initialize();
        let edited = form.update("tenure", "24").expect("tenure edit");

        assert_eq!(edited.tenure, "24");
        for field in FieldName::ALL
            .into_iter()
            .filter(|field| *field != FieldName::Tenure)
        {
            assert_eq!(form.value(field), edited.value(field), "{field} changed");
        }
        assert_eq!(form.tenure, "12", "input form must not be mutated");
    }

    #[test]
    fn update_parses_categorical_options() {
        let form = FormInput::initialize()
            .update("contract", "Two year")
            .and_then(|form| form.update("payment_method", "Credit card (automatic)"))
            .and_then(|form| form.update("online_backup", "No internet service"))
            .expect("valid options");

        assert_eq!(form.contract, Contract::TwoYear);
        assert_eq!(form.payment_method, PaymentMethod::CreditCard);
        assert_eq!(form.online_backup, InternetAddon::NoInternetService);
    }

    #[test]
    fn update_rejects_unknown_field() {
        let err = FormInput::initialize()
            .update("customer_id", "1234")
            .expect_err("must reject");
        assert_eq!(err, FormError::UnknownField("customer_id".into()));
    }

    #[test]
    fn update_rejects_out_of_domain_option() {
        let err = FormInput::initialize()
            .update("contract", "Three year")
            .expect_err("must reject");
        assert_eq!(
            err,
            FormError::InvalidOption {
                field: FieldName::Contract,
                value: "Three year".into(),
            }
        );
    }

    #[test]
    fn numeric_fields_accept_raw_text_until_normalized() {
        let form = FormInput::initialize()
            .update("monthly_charges", "abc")
            .expect("edits are not validated");
        let err = form.normalize().expect_err("must fail to coerce");
        assert_eq!(
            err,
            FormError::InvalidNumber {
                field: FieldName::MonthlyCharges,
                value: "abc".into(),
            }
        );
    }

    #[test]
    fn normalize_coerces_numeric_fields() {
        let form = FormInput::initialize()
            .update("senior_citizen", "1")
            .and_then(|form| form.update("tenure", " 24.0 "))
            .and_then(|form| form.update("monthly_charges", "89.95"))
            .and_then(|form| form.update("total_charges", "2158.8"))
            .expect("edits");

        let request = form.normalize().expect("normalize");
        assert_eq!(request.senior_citizen, 1);
        assert_eq!(request.tenure, 24);
        assert_eq!(request.monthly_charges, 89.95);
        assert_eq!(request.total_charges, 2158.8);
        assert_eq!(request.gender, Gender::Female);
    }

    #[test]
    fn normalize_is_idempotent() {
        let form = FormInput::initialize()
            .update("tenure", "7")
            .expect("edit");
        assert_eq!(form.normalize(), form.normalize());
    }

    #[test]
    fn fractional_integer_fields_are_rejected() {
        let form = FormInput::initialize()
            .update("tenure", "3.5")
            .expect("edit");
        assert!(matches!(
            form.normalize(),
            Err(FormError::InvalidNumber {
                field: FieldName::Tenure,
                ..
            })
        ));
    }

    #[test]
    fn out_of_range_integer_fields_are_rejected() {
        for raw in ["1e30", "-1e30", "9223372036854775808.0"] {
            let form = FormInput::initialize()
                .update("tenure", raw)
                .expect("edit");
            assert_eq!(
                form.normalize().map(|request| request.tenure),
                Err(FormError::InvalidNumber {
                    field: FieldName::Tenure,
                    value: raw.into(),
                }),
                "{raw} must not saturate"
            );
        }

        let form = FormInput::initialize()
            .update("tenure", "1e3")
            .expect("edit");
        assert_eq!(form.normalize().map(|request| request.tenure), Ok(1000));
    }
}
