use bon::Builder;
use const_oid::ObjectIdentifier;
use der::Any;
use der::asn1::{PrintableStringRef, SetOfVec, Utf8StringRef};
use time::Duration;
use time::OffsetDateTime;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use crate::error::Result;

/// id-at-commonName
pub const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
/// id-at-countryName
pub const COUNTRY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
/// id-at-organizationName
pub const ORGANIZATION: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");

/// Distinguished name parameters for building a certificate or request subject.
///
/// Absent fields are left out of the encoded name entirely.
///
/// # Fields
/// * `common_name` - The common name (CN).
/// * `organization` - The organization (O).
/// * `country` - The two-letter country code (C).
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: Option<String>,
    pub organization: Option<String>,
    pub country: Option<String>,
}

impl DistinguishedName {
    /// A name holding nothing but a common name.
    pub fn common_name_only(common_name: impl Into<String>) -> Self {
        Self {
            common_name: Some(common_name.into()),
            ..Self::default()
        }
    }

    /// Converts the distinguished name to an X.509-compatible format.
    ///
    /// Country is encoded as PrintableString, everything else as UTF8String,
    /// one attribute per RDN in C, O, CN order.
    pub fn as_x509_name(&self) -> Result<Name> {
        let mut rdns = Vec::new();
        if let Some(country) = &self.country {
            let value = Any::encode_from(&PrintableStringRef::new(country)?)?;
            rdns.push(single_attribute_rdn(COUNTRY, value)?);
        }
        if let Some(organization) = &self.organization {
            let value = Any::encode_from(&Utf8StringRef::new(organization)?)?;
            rdns.push(single_attribute_rdn(ORGANIZATION, value)?);
        }
        if let Some(common_name) = &self.common_name {
            let value = Any::encode_from(&Utf8StringRef::new(common_name)?)?;
            rdns.push(single_attribute_rdn(COMMON_NAME, value)?);
        }
        Ok(RdnSequence(rdns))
    }
}

fn single_attribute_rdn(oid: ObjectIdentifier, value: Any) -> Result<RelativeDistinguishedName> {
    let attributes = SetOfVec::try_from(vec![AttributeTypeAndValue { oid, value }])?;
    Ok(RelativeDistinguishedName(attributes))
}

/// Certificate validity period.
///
/// This struct represents the `notBefore` and `notAfter` fields in a certificate.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity period starting now for the given number of days.
    ///
    /// # Arguments
    /// * `days` - The number of days for the validity period.
    ///
    /// # Returns
    /// A `Validity` object.
    pub fn for_days(days: i64) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            not_before: now,
            not_after: now + Duration::days(days),
        }
    }
}
