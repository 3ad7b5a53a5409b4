//! Fixed attribute registry.
//!
//! Every well-known vehicle profile attribute maps to exactly one path and one
//! declared type. The table is built once on first use and never mutated, so
//! it can be read from any number of threads.
//!
//! Lookup by `VehicleAttribute` is total; lookup by free-form name (CLI input)
//! goes through `VehicleAttribute::from_name`.

use std::str::FromStr;
use std::sync::LazyLock;

use crate::domain::{AttributeDescriptor, ValueKind};

/// Well-known vehicle profile attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VehicleAttribute {
    Make,
    Model,
    UserId,
    Msisdn,
    Vin,
    VehicleId,
    Name,
    ModelYear,
    DestinationCountry,
    LicensePlate,
    SoldRegion,
    BlockEnrollment,
    AuthorizedPartners,
    HuProvisionedServices,
    AuthorizedUsers,
    HuClientId,
    ModelCode,
    Imei,
    Imsi,
    HuEcuType,
    DeviceMgmtApproach,
    HuSerialNo,
}

/// `(attribute, name, path, kind)`, in `VehicleAttribute` declaration order.
const TABLE: &[(VehicleAttribute, &str, &str, ValueKind)] = &[
    (VehicleAttribute::Make, "make", "$.data.vehicleAttributes.make", ValueKind::String),
    (VehicleAttribute::Model, "model", "$.data.vehicleAttributes.model", ValueKind::String),
    (VehicleAttribute::UserId, "userId", "$.data.authorizedUsers[0].userId", ValueKind::String),
    (VehicleAttribute::Msisdn, "msisdn", "$.data.modemInfo.msisdn", ValueKind::String),
    (VehicleAttribute::Vin, "vin", "$.data.vin", ValueKind::String),
    (VehicleAttribute::VehicleId, "vehicleId", "$.data.vehicleId", ValueKind::String),
    (VehicleAttribute::Name, "name", "$.data.vehicleAttributes.name", ValueKind::String),
    (VehicleAttribute::ModelYear, "modelYear", "$.data.vehicleAttributes.modelYear", ValueKind::String),
    (
        VehicleAttribute::DestinationCountry,
        "destinationCountry",
        "$.data.vehicleAttributes.destinationCountry",
        ValueKind::String,
    ),
    (
        VehicleAttribute::LicensePlate,
        "licensePlate",
        "$.data.authorizedUsers[0].licensePlate",
        ValueKind::String,
    ),
    (VehicleAttribute::SoldRegion, "soldRegion", "$.data.soldRegion", ValueKind::String),
    (VehicleAttribute::BlockEnrollment, "blockEnrollment", "$.data.blockEnrollment", ValueKind::Boolean),
    (
        VehicleAttribute::AuthorizedPartners,
        "authorizedPartners",
        "$.data.authorizedPartners",
        ValueKind::Opaque,
    ),
    (
        VehicleAttribute::HuProvisionedServices,
        "huProvisionedServices",
        "$.data.ecus.hu.provisionedServices.services[*].serviceId",
        ValueKind::StringSet,
    ),
    (VehicleAttribute::AuthorizedUsers, "authorizedUsers", "$.data.authorizedUsers", ValueKind::Opaque),
    (VehicleAttribute::HuClientId, "huClientId", "$.data.ecus.hu.clientId", ValueKind::String),
    (VehicleAttribute::ModelCode, "modelCode", "$.data.vehicleAttributes.modelCode", ValueKind::String),
    (VehicleAttribute::Imei, "imei", "$.data.modemInfo.imei", ValueKind::String),
    (VehicleAttribute::Imsi, "imsi", "$.data.modemInfo.imsi", ValueKind::String),
    (VehicleAttribute::HuEcuType, "huEcuType", "$.data.ecus.hu.ecuType", ValueKind::String),
    (
        VehicleAttribute::DeviceMgmtApproach,
        "deviceMgmtApproach",
        "$.data.deviceMgmtApproach",
        ValueKind::String,
    ),
    (VehicleAttribute::HuSerialNo, "huSerialNo", "$.data.ecus.hu.serialNo", ValueKind::String),
];

static DESCRIPTORS: LazyLock<Vec<AttributeDescriptor>> = LazyLock::new(|| {
    TABLE
        .iter()
        .map(|(_, name, path, kind)| AttributeDescriptor::new(*name, *path, *kind))
        .collect()
});

impl VehicleAttribute {
    pub const ALL: [VehicleAttribute; 22] = [
        VehicleAttribute::Make,
        VehicleAttribute::Model,
        VehicleAttribute::UserId,
        VehicleAttribute::Msisdn,
        VehicleAttribute::Vin,
        VehicleAttribute::VehicleId,
        VehicleAttribute::Name,
        VehicleAttribute::ModelYear,
        VehicleAttribute::DestinationCountry,
        VehicleAttribute::LicensePlate,
        VehicleAttribute::SoldRegion,
        VehicleAttribute::BlockEnrollment,
        VehicleAttribute::AuthorizedPartners,
        VehicleAttribute::HuProvisionedServices,
        VehicleAttribute::AuthorizedUsers,
        VehicleAttribute::HuClientId,
        VehicleAttribute::ModelCode,
        VehicleAttribute::Imei,
        VehicleAttribute::Imsi,
        VehicleAttribute::HuEcuType,
        VehicleAttribute::DeviceMgmtApproach,
        VehicleAttribute::HuSerialNo,
    ];

    /// Descriptor for this attribute.
    pub fn descriptor(self) -> &'static AttributeDescriptor {
        &DESCRIPTORS[self as usize]
    }

    pub fn name(self) -> &'static str {
        TABLE[self as usize].1
    }

    pub fn path(self) -> &'static str {
        TABLE[self as usize].2
    }

    pub fn kind(self) -> ValueKind {
        TABLE[self as usize].3
    }

    /// Reverse lookup by logical name (exact match).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.name() == name)
    }
}

impl std::fmt::Display for VehicleAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VehicleAttribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|a| a.name()).collect();
            format!("unknown attribute '{s}' (known: {})", known.join(", "))
        })
    }
}

/// Descriptors for a list of registry attributes, in the given order.
pub fn descriptors_for(attributes: &[VehicleAttribute]) -> Vec<AttributeDescriptor> {
    attributes.iter().map(|a| a.descriptor().clone()).collect()
}
