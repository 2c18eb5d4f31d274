//! JSON design files.
//!
//! A design is an [`Architecture`] plus a [`Network`]. Derived data (arena
//! ids, per-node and per-edge pin lists) is not stored; it is rebuilt on
//! load after every reference has been checked.

use dpo_arch::{Architecture, RegionId};
use dpo_network::{Network, PinId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors loading or saving a design.
#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    /// The file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The JSON was malformed or did not match the design schema.
    #[error("failed to parse design: {0}")]
    Parse(#[from] serde_json::Error),
    /// A pin names a node or edge that does not exist.
    #[error("pin {0} references a missing node or edge")]
    DanglingPin(PinId),
    /// A node names a fence region the architecture does not define.
    #[error("node {node} belongs to undefined region {region}")]
    UnknownRegion {
        /// Node name.
        node: String,
        /// Region id.
        region: RegionId,
    },
    /// The die rectangle has a minimum above its maximum.
    #[error("die ({xmin}, {ymin})-({xmax}, {ymax}) is inverted")]
    InvalidDie {
        /// Left edge.
        xmin: i64,
        /// Bottom edge.
        ymin: i64,
        /// Right edge.
        xmax: i64,
        /// Top edge.
        ymax: i64,
    },
    /// The architecture has no rows.
    #[error("the architecture has no rows")]
    NoRows,
    /// A row has a non-positive height, site width or site count.
    #[error("row at y={bottom} is invalid: {reason}")]
    InvalidRow {
        /// Bottom of the row.
        bottom: i64,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// A placement problem as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Rows, regions and spacing rules.
    pub architecture: Architecture,
    /// Cells, nets and pins.
    pub network: Network,
}

impl Design {
    /// Parses and validates a design.
    pub fn from_json_str(json: &str) -> Result<Self, DesignError> {
        let mut design: Design = serde_json::from_str(json)?;
        design.validate()?;
        design.network.rebuild_indices();
        design.architecture.sort_rows();
        Ok(design)
    }

    /// Reads a design file.
    pub fn load(path: &Path) -> Result<Self, DesignError> {
        let json = std::fs::read_to_string(path).map_err(|source| DesignError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Serializes the design as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, DesignError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the design to `path`.
    pub fn save(&self, path: &Path) -> Result<(), DesignError> {
        let json = self.to_json_string()?;
        std::fs::write(path, json).map_err(|source| DesignError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn validate(&self) -> Result<(), DesignError> {
        if let Some(pin) = self.network.find_dangling_pin() {
            return Err(DesignError::DanglingPin(pin));
        }
        let arch = &self.architecture;
        if arch.die.is_empty() {
            let die = arch.die;
            return Err(DesignError::InvalidDie {
                xmin: die.xmin,
                ymin: die.ymin,
                xmax: die.xmax,
                ymax: die.ymax,
            });
        }
        if arch.rows.is_empty() {
            return Err(DesignError::NoRows);
        }
        for row in &arch.rows {
            let reason = if row.height <= 0 {
                "height must be positive"
            } else if row.site_width <= 0 {
                "site width must be positive"
            } else if row.num_sites <= 0 {
                "row has no sites"
            } else {
                continue;
            };
            return Err(DesignError::InvalidRow {
                bottom: row.bottom,
                reason,
            });
        }
        for node in &self.network.nodes {
            if node.region != RegionId::DEFAULT && arch.region(node.region).is_none() {
                return Err(DesignError::UnknownRegion {
                    node: node.name.clone(),
                    region: node.region,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpo_arch::{Orientation, Rect, Row};
    use dpo_network::{Node, NodeId};

    fn design() -> Design {
        let rows = vec![Row {
            bottom: 0,
            height: 10,
            site_width: 1,
            min_x: 0,
            num_sites: 100,
            orient: Orientation::N,
        }];
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 10, 10).at(0, 0));
        let b = nw.add_node(Node::new("b", 10, 10).at(50, 0));
        let e = nw.add_edge("n1");
        nw.add_pin(a, e, 5, 5);
        nw.add_pin(b, e, 5, 5);
        Design {
            architecture: Architecture::new(Rect::new(0, 0, 100, 10), rows),
            network: nw,
        }
    }

    #[test]
    fn save_and_load_restore_pin_lists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top.json");
        design().save(&path).unwrap();
        let loaded = Design::load(&path).unwrap();
        assert_eq!(loaded.network.node_count(), 2);
        assert_eq!(loaded.network.node(NodeId::from_raw(1)).id, NodeId::from_raw(1));
        assert_eq!(loaded.network.node(NodeId::from_raw(1)).pins.len(), 1);
        assert_eq!(loaded.network.edges[0].pins.len(), 2);
        assert_eq!(dpo_network::total_hpwl(&loaded.network), 50);
    }

    #[test]
    fn dangling_pin_is_rejected() {
        let mut d = design();
        d.network.pins[1].node = NodeId::from_raw(9);
        let json = serde_json::to_string(&d).unwrap();
        assert!(matches!(
            Design::from_json_str(&json),
            Err(DesignError::DanglingPin(p)) if p.index() == 1
        ));
    }

    #[test]
    fn bad_rows_are_rejected() {
        let mut d = design();
        d.architecture.rows[0].site_width = 0;
        let json = serde_json::to_string(&d).unwrap();
        assert!(matches!(
            Design::from_json_str(&json),
            Err(DesignError::InvalidRow { bottom: 0, .. })
        ));

        d.architecture.rows.clear();
        let json = serde_json::to_string(&d).unwrap();
        assert!(matches!(Design::from_json_str(&json), Err(DesignError::NoRows)));
    }

    #[test]
    fn inverted_die_is_rejected() {
        let mut d = design();
        d.architecture.die = Rect::new(100, 0, 0, 20);
        let json = serde_json::to_string(&d).unwrap();
        assert!(matches!(
            Design::from_json_str(&json),
            Err(DesignError::InvalidDie { xmin: 100, xmax: 0, .. })
        ));

        d.architecture.die = Rect::new(0, 30, 100, 10);
        let json = serde_json::to_string(&d).unwrap();
        assert!(matches!(
            Design::from_json_str(&json),
            Err(DesignError::InvalidDie { ymin: 30, ymax: 10, .. })
        ));
    }

    #[test]
    fn undefined_region_is_rejected() {
        let mut d = design();
        d.network.nodes[0].region = RegionId::from_raw(4);
        let json = serde_json::to_string(&d).unwrap();
        assert!(matches!(
            Design::from_json_str(&json),
            Err(DesignError::UnknownRegion { .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Design::load(Path::new("/nonexistent/top.json")).unwrap_err();
        assert!(err.to_string().starts_with("/nonexistent/top.json"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            Design::from_json_str("{\"architecture\": 3}"),
            Err(DesignError::Parse(_))
        ));
    }
}
