use crate::model::{Epic, Initiative};
use crate::protocol::OutboundMessage;

pub const DISCONNECTED_PLACEHOLDER: &str = "Connect to AWS to load options";
pub const LOADING_PLACEHOLDER: &str = "Loading...";

/// One rendered option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl DropdownOption {
    fn placeholder(label: &str) -> Self {
        Self {
            value: String::new(),
            label: label.to_string(),
            disabled: true,
        }
    }
}

/// Initiative and epic dropdowns, gated by the AWS connection
#[derive(Debug, Default)]
pub struct Dropdowns {
    connected: bool,
    pub initiatives: Option<Vec<Initiative>>,
    pub epics: Option<Vec<Epic>>,
    pub selected_initiative: usize,
}

impl Dropdowns {
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Track the connection flag. Becoming connected requests both lists at
    /// once; losing the connection drops whatever was loaded.
    pub fn set_connected(&mut self, connected: bool) -> Vec<OutboundMessage> {
        let was_connected = self.connected;
        self.connected = connected;

        if connected && !was_connected {
            self.initiatives = None;
            self.epics = None;
            return vec![OutboundMessage::LoadInitiatives, OutboundMessage::LoadEpics];
        }
        if !connected {
            self.initiatives = None;
            self.epics = None;
            self.selected_initiative = 0;
        }
        Vec::new()
    }

    pub fn set_initiatives(&mut self, initiatives: Vec<Initiative>) {
        if !self.connected {
            tracing::debug!("initiatives arrived while disconnected, ignored");
            return;
        }
        self.selected_initiative = 0;
        self.initiatives = Some(initiatives);
    }

    pub fn set_epics(&mut self, epics: Vec<Epic>) {
        if !self.connected {
            tracing::debug!("epics arrived while disconnected, ignored");
            return;
        }
        self.epics = Some(epics);
    }

    pub fn epic_list(&self) -> &[Epic] {
        self.epics.as_deref().unwrap_or(&[])
    }

    pub fn initiative_options(&self) -> Vec<DropdownOption> {
        if !self.connected {
            return vec![DropdownOption::placeholder(DISCONNECTED_PLACEHOLDER)];
        }
        match &self.initiatives {
            None => vec![DropdownOption::placeholder(LOADING_PLACEHOLDER)],
            Some(list) if list.is_empty() => vec![DropdownOption::placeholder("No initiatives available")],
            Some(list) => list
                .iter()
                .map(|i| DropdownOption {
                    value: i.id.clone(),
                    label: i.name.clone(),
                    disabled: false,
                })
                .collect(),
        }
    }

    pub fn epic_options(&self) -> Vec<DropdownOption> {
        if !self.connected {
            return vec![DropdownOption::placeholder(DISCONNECTED_PLACEHOLDER)];
        }
        match &self.epics {
            None => vec![DropdownOption::placeholder(LOADING_PLACEHOLDER)],
            Some(list) if list.is_empty() => vec![DropdownOption::placeholder("No epics available")],
            Some(list) => list
                .iter()
                .map(|e| DropdownOption {
                    value: e.id.clone(),
                    label: e.label(),
                    disabled: false,
                })
                .collect(),
        }
    }

    pub fn selected_initiative(&self) -> Option<&Initiative> {
        self.initiatives
            .as_ref()
            .and_then(|list| list.get(self.selected_initiative))
    }

    pub fn cycle_initiative(&mut self) {
        let count = self.initiatives.as_ref().map(Vec::len).unwrap_or(0);
        if count > 0 {
            self.selected_initiative = (self.selected_initiative + 1) % count;
        }
    }

    /// Label shown for an epic id, falling back to the raw id
    pub fn epic_label(&self, id: &str) -> String {
        self.epic_list()
            .iter()
            .find(|e| e.id == id)
            .map(Epic::label)
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epic(name: &str, team: Option<&str>) -> Epic {
        Epic {
            id: format!("id-{}", name),
            name: name.to_string(),
            team_name: team.map(str::to_string),
        }
    }

    #[test]
    fn test_disconnected_shows_single_disabled_placeholder() {
        let dropdowns = Dropdowns::default();
        for options in [dropdowns.initiative_options(), dropdowns.epic_options()] {
            assert_eq!(options.len(), 1);
            assert!(options[0].disabled);
            assert_eq!(options[0].label, DISCONNECTED_PLACEHOLDER);
        }
    }

    #[test]
    fn test_connecting_requests_both_lists() {
        let mut dropdowns = Dropdowns::default();
        let msgs = dropdowns.set_connected(true);
        assert_eq!(msgs, vec![OutboundMessage::LoadInitiatives, OutboundMessage::LoadEpics]);

        // Already connected: no duplicate loads
        assert!(dropdowns.set_connected(true).is_empty());
    }

    #[test]
    fn test_disconnected_never_loads() {
        let mut dropdowns = Dropdowns::default();
        assert!(dropdowns.set_connected(false).is_empty());
        dropdowns.set_epics(vec![epic("A", None)]);
        assert!(dropdowns.epics.is_none());
    }

    #[test]
    fn test_epic_label_with_and_without_team() {
        let mut dropdowns = Dropdowns::default();
        dropdowns.set_connected(true);
        dropdowns.set_epics(vec![epic("Checkout", Some("Payments")), epic("Search", None), epic("Docs", Some(""))]);

        let labels: Vec<_> = dropdowns.epic_options().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, vec!["Checkout (Payments)", "Search", "Docs"]);
    }

    #[test]
    fn test_disconnect_clears_options() {
        let mut dropdowns = Dropdowns::default();
        dropdowns.set_connected(true);
        dropdowns.set_initiatives(vec![Initiative { id: "i1".into(), name: "Q4".into() }]);
        dropdowns.set_connected(false);

        assert!(dropdowns.initiatives.is_none());
        assert_eq!(dropdowns.initiative_options()[0].label, DISCONNECTED_PLACEHOLDER);
    }
}
