use crate::shape::ResponseShape;

/// One inspection criterion. The catalog is closed: adding a check is
/// adding one entry here, never a new route handler.
#[derive(Clone, Copy, Debug)]
pub struct CheckDefinition {
    pub id: &'static str,
    pub criterion: &'static str,
}

impl CheckDefinition {
    /// Render the full instruction for a given response shape. The
    /// criterion stays shape-independent; only the reply directive
    /// changes per tier.
    pub fn instruction(&self, shape: ResponseShape) -> String {
        match shape {
            ResponseShape::SingleToken => format!(
                "Analyze this installation photo. {} Respond with exactly one word: PASS or FAIL.",
                self.criterion
            ),
            ResponseShape::TokenPlusReason => format!(
                "Analyze this installation photo. {} Respond with PASS or FAIL on the first line, followed by a short reason on the second line.",
                self.criterion
            ),
            ResponseShape::Prefixed => format!(
                "Analyze this installation photo. {} Respond with exactly: 'PASS: [reason]' or 'FAIL: [reason]'",
                self.criterion
            ),
        }
    }
}

const CHECKS: &[CheckDefinition] = &[
    CheckDefinition {
        id: "applianceLevelled",
        criterion: "Verify that the appliance stands level on all four feet.",
    },
    CheckDefinition {
        id: "drainHoseSecured",
        criterion: "Verify that the drain hose is secured in the standpipe or drain connection.",
    },
    CheckDefinition {
        id: "powerCordPluggedIn",
        criterion: "Verify that the power cord is plugged into the wall socket.",
    },
    CheckDefinition {
        id: "tapTurnedOn",
        criterion: "Verify that the water tap is turned on.",
    },
    CheckDefinition {
        id: "transitBoltsRemoved",
        criterion: "Verify that the transit bolts have been removed from the rear panel.",
    },
    CheckDefinition {
        id: "waterFeedAttachedToTap",
        criterion: "Verify that the water feed hose is attached to the tap.",
    },
];

/// Static lookup table from check identifier to definition. Unknown
/// identifiers are a hard rejection, never a default instruction.
#[derive(Clone, Copy, Debug, Default)]
pub struct Catalog;

impl Catalog {
    pub fn lookup(&self, check_id: &str) -> Option<&'static CheckDefinition> {
        CHECKS.iter().find(|def| def.id == check_id)
    }

    /// Valid identifiers, sorted, for rejection bodies.
    pub fn ids(&self) -> Vec<&'static str> {
        CHECKS.iter().map(|def| def.id).collect()
    }

    pub fn len(&self) -> usize {
        CHECKS.len()
    }

    pub fn is_empty(&self) -> bool {
        CHECKS.is_empty()
    }
}
