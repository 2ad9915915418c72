use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{FormError, UnknownOption};

/// Declares a closed categorical field type whose variants serialize to the
/// literal option strings the prediction service was trained on.
macro_rules! option_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn options() -> Vec<&'static str> {
                Self::ALL.iter().map(|option| option.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let raw = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str() == raw)
                    .ok_or_else(|| UnknownOption(raw.to_string()))
            }
        }
    };
}

option_enum!(Gender {
    Female => "Female",
    Male => "Male",
});

option_enum!(YesNo {
    Yes => "Yes",
    No => "No",
});

option_enum!(MultipleLines {
    No => "No",
    Yes => "Yes",
    NoPhoneService => "No phone service",
});

option_enum!(InternetService {
    Dsl => "DSL",
    FiberOptic => "Fiber optic",
    No => "No",
});

// Shared by every add-on that requires an internet subscription.
option_enum!(InternetAddon {
    No => "No",
    Yes => "Yes",
    NoInternetService => "No internet service",
});

option_enum!(Contract {
    MonthToMonth => "Month-to-month",
    OneYear => "One year",
    TwoYear => "Two year",
});

option_enum!(PaymentMethod {
    ElectronicCheck => "Electronic check",
    MailedCheck => "Mailed check",
    BankTransfer => "Bank transfer (automatic)",
    CreditCard => "Credit card (automatic)",
});

/// Every field the form exposes, in the order the service schema lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Gender,
    SeniorCitizen,
    Partner,
    Dependents,
    Tenure,
    PhoneService,
    MultipleLines,
    InternetService,
    OnlineSecurity,
    OnlineBackup,
    DeviceProtection,
    TechSupport,
    StreamingTv,
    StreamingMovies,
    Contract,
    PaperlessBilling,
    PaymentMethod,
    MonthlyCharges,
    TotalCharges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Categorical,
    Integer,
    Decimal,
}

impl FieldName {
    pub const ALL: [FieldName; 19] = [
        FieldName::Gender,
        FieldName::SeniorCitizen,
        FieldName::Partner,
        FieldName::Dependents,
        FieldName::Tenure,
        FieldName::PhoneService,
        FieldName::MultipleLines,
        FieldName::InternetService,
        FieldName::OnlineSecurity,
        FieldName::OnlineBackup,
        FieldName::DeviceProtection,
        FieldName::TechSupport,
        FieldName::StreamingTv,
        FieldName::StreamingMovies,
        FieldName::Contract,
        FieldName::PaperlessBilling,
        FieldName::PaymentMethod,
        FieldName::MonthlyCharges,
        FieldName::TotalCharges,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Gender => "gender",
            FieldName::SeniorCitizen => "senior_citizen",
            FieldName::Partner => "partner",
            FieldName::Dependents => "dependents",
            FieldName::Tenure => "tenure",
            FieldName::PhoneService => "phone_service",
            FieldName::MultipleLines => "multiple_lines",
            FieldName::InternetService => "internet_service",
            FieldName::OnlineSecurity => "online_security",
            FieldName::OnlineBackup => "online_backup",
            FieldName::DeviceProtection => "device_protection",
            FieldName::TechSupport => "tech_support",
            FieldName::StreamingTv => "streaming_tv",
            FieldName::StreamingMovies => "streaming_movies",
            FieldName::Contract => "contract",
            FieldName::PaperlessBilling => "paperless_billing",
            FieldName::PaymentMethod => "payment_method",
            FieldName::MonthlyCharges => "monthly_charges",
            FieldName::TotalCharges => "total_charges",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FieldName::SeniorCitizen | FieldName::Tenure => FieldKind::Integer,
            FieldName::MonthlyCharges | FieldName::TotalCharges => FieldKind::Decimal,
            _ => FieldKind::Categorical,
        }
    }

    /// Allowed option strings for categorical fields; empty for numeric ones.
    pub fn options(self) -> Vec<&'static str> {
        match self {
            FieldName::Gender => Gender::options(),
            FieldName::Partner
            | FieldName::Dependents
            | FieldName::PhoneService
            | FieldName::PaperlessBilling => YesNo::options(),
            FieldName::MultipleLines => MultipleLines::options(),
            FieldName::InternetService => InternetService::options(),
            FieldName::OnlineSecurity
            | FieldName::OnlineBackup
            | FieldName::DeviceProtection
            | FieldName::TechSupport
            | FieldName::StreamingTv
            | FieldName::StreamingMovies => InternetAddon::options(),
            FieldName::Contract => Contract::options(),
            FieldName::PaymentMethod => PaymentMethod::options(),
            FieldName::SeniorCitizen
            | FieldName::Tenure
            | FieldName::MonthlyCharges
            | FieldName::TotalCharges => Vec::new(),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = FormError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        FieldName::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == raw)
            .ok_or_else(|| FormError::UnknownField(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub const MEDIUM_THRESHOLD: f64 = 0.4;
    pub const HIGH_THRESHOLD: f64 = 0.7;

    /// Buckets a churn probability. Anything below the medium threshold,
    /// including NaN, is `Low`; callers reject non-finite probabilities first.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= Self::HIGH_THRESHOLD {
            RiskCategory::High
        } else if probability >= Self::MEDIUM_THRESHOLD {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_parse_from_wire_names() {
        for field in FieldName::ALL {
            assert_eq!(field.as_str().parse::<FieldName>(), Ok(field));
        }
        assert_eq!(
            "churn".parse::<FieldName>(),
            Err(FormError::UnknownField("churn".into()))
        );
    }

    #[test]
    fn numeric_fields_have_no_options() {
        let numeric: Vec<_> = FieldName::ALL
            .into_iter()
            .filter(|field| field.kind() != FieldKind::Categorical)
            .collect();
        assert_eq!(
            numeric,
            vec![
                FieldName::SeniorCitizen,
                FieldName::Tenure,
                FieldName::MonthlyCharges,
                FieldName::TotalCharges,
            ]
        );
        assert!(numeric.iter().all(|field| field.options().is_empty()));
    }

    #[test]
    fn options_parse_exact_literals_only() {
        assert_eq!("Fiber optic".parse::<InternetService>(), Ok(InternetService::FiberOptic));
        assert_eq!(
            "No phone service".parse::<MultipleLines>(),
            Ok(MultipleLines::NoPhoneService)
        );
        assert_eq!(
            "fiber optic".parse::<InternetService>(),
            Err(UnknownOption("fiber optic".into()))
        );
        assert_eq!(FieldName::PaymentMethod.options().len(), 4);
    }
}
