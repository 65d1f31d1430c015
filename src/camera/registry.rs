use crate::camera::resolver::{CameraResolver, ResolvedCamera, manual_camera};

/// Address format of a camera registry entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryFormat {
    /// `"Front Door Camera (1)"`: the number sits between parentheses.
    #[default]
    Parenthesized,
    /// `"server123:01"`: server id, colon, zero-padded number.
    ServerQualified,
}

impl RegistryFormat {
    /// Label used when listing cameras.
    pub fn label(self) -> &'static str {
        match self {
            Self::Parenthesized => "parenthesized registry",
            Self::ServerQualified => "server-qualified registry",
        }
    }

    /// Extract the camera number from a device address, or `None` if it does not parse.
    pub fn parse_address(self, address: &str) -> Option<String> {
        match self {
            Self::Parenthesized => parse_parenthesized(address),
            Self::ServerQualified => parse_server_qualified(address),
        }
    }
}

/// Text between the first `(` and the next `)`. Contents are returned verbatim.
fn parse_parenthesized(address: &str) -> Option<String> {
    let open = address.find('(')?;
    let rest = &address[open + 1..];
    let close = rest.find(')')?;
    Some(rest[..close].to_string())
}

/// Everything after the first `:`, with leading zeros stripped (`"00"` becomes `"0"`).
fn parse_server_qualified(address: &str) -> Option<String> {
    let (server, camera) = address.split_once(':')?;
    if server.is_empty() || camera.is_empty() {
        return None;
    }
    let trimmed = camera.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
}

/// One device in the camera directory.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CameraDevice {
    /// Display name.
    pub name: String,
    /// Registry-specific address.
    pub address: String,
    /// Disabled devices are ignored.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// How `address` encodes the camera number.
    #[serde(default)]
    pub format: RegistryFormat,
}

fn enabled_by_default() -> bool {
    true
}

/// A camera discovered in the directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredCamera {
    /// Camera number.
    pub number: String,
    /// Display name.
    pub name: String,
    /// Registry the entry came from.
    pub format: RegistryFormat,
}

/// Camera directory spanning every registry format.
#[derive(Clone, Debug, Default)]
pub struct CameraDirectory {
    devices: Vec<CameraDevice>,
}

impl CameraDirectory {
    /// Build a directory over `devices`.
    pub fn new(devices: Vec<CameraDevice>) -> Self {
        Self { devices }
    }

    /// Enabled cameras with parseable addresses, sorted by camera number.
    pub fn discover(&self) -> Vec<DiscoveredCamera> {
        let mut found: Vec<DiscoveredCamera> = self
            .devices
            .iter()
            .filter(|d| d.enabled)
            .filter_map(|d| {
                let Some(number) = d.format.parse_address(&d.address) else {
                    tracing::debug!(device = %d.name, address = %d.address, "unparseable camera address");
                    return None;
                };
                Some(DiscoveredCamera {
                    number,
                    name: d.name.clone(),
                    format: d.format,
                })
            })
            .collect();
        found.sort_by(|a, b| sort_key(&a.number).cmp(&sort_key(&b.number)));
        found
    }
}

fn sort_key(number: &str) -> (u64, &str) {
    (number.trim().parse().unwrap_or(u64::MAX), number)
}

impl CameraResolver for CameraDirectory {
    fn resolve(&self, camera_ref: &str) -> Option<ResolvedCamera> {
        let wanted = camera_ref.trim();
        self.discover()
            .into_iter()
            .find(|c| c.number.trim() == wanted)
            .map(|c| ResolvedCamera {
                number: c.number.trim().to_string(),
                display_name: c.name,
            })
            .or_else(|| manual_camera(wanted))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/camera/registry.rs"]
mod tests;
