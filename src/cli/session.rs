//! Interactive menu over the genealogy service.
//!
//! Reads one answer per line from any `BufRead` and writes to any `Write`,
//! so the same session serves the terminal, script files and tests.
//! Invalid answers are reported and asked again; end of input ends the
//! session without error.

use std::io::{self, BufRead, Write};

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{GenealogyService, NewPerson, ParentLink, PersonSummary};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{DomainError, Person, TraversalOrder};

const MENU: &[(&str, &str)] = &[
    ("1", "Insert person"),
    ("2", "Assign parent"),
    ("3", "Find by id"),
    ("4", "Find by name"),
    ("5", "Preorder"),
    ("6", "Inorder"),
    ("7", "Postorder"),
    ("8", "Ancestors"),
    ("9", "Descendants"),
    ("10", "Family tree"),
    ("0", "Exit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Insert,
    AssignParent,
    FindById,
    FindByName,
    Traverse(TraversalOrder),
    Ancestors,
    Descendants,
    FamilyTree,
    Exit,
}

impl Action {
    fn parse(choice: &str) -> Option<Self> {
        let action = match choice.trim() {
            "1" => Action::Insert,
            "2" => Action::AssignParent,
            "3" => Action::FindById,
            "4" => Action::FindByName,
            "5" => Action::Traverse(TraversalOrder::Preorder),
            "6" => Action::Traverse(TraversalOrder::Inorder),
            "7" => Action::Traverse(TraversalOrder::Postorder),
            "8" => Action::Ancestors,
            "9" => Action::Descendants,
            "10" => Action::FamilyTree,
            "0" => Action::Exit,
            _ => return None,
        };
        Some(action)
    }
}

/// Whether the menu loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

fn out_err(e: io::Error) -> CliError {
    CliError::io("write output", e)
}

pub struct Session<R, W> {
    input: R,
    out: W,
    service: GenealogyService,
    settings: Settings,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W, settings: Settings) -> Self {
        Self {
            input,
            out,
            service: GenealogyService::new(),
            settings,
        }
    }

    pub fn service(&self) -> &GenealogyService {
        &self.service
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Run the menu until the user exits or input ends.
    #[instrument(level = "debug", skip(self))]
    pub fn run(&mut self) -> CliResult<()> {
        loop {
            self.print_menu()?;
            let prompt = self.settings.prompt.clone();
            let Some(choice) = self.ask(prompt.trim_end())? else {
                debug!("input closed");
                break;
            };
            let Some(action) = Action::parse(&choice) else {
                output::error(&mut self.out, &format!("unknown option '{}'", choice.trim()))
                    .map_err(out_err)?;
                continue;
            };
            debug!("action: {:?}", action);
            if self.dispatch(action)? == Flow::Stop {
                break;
            }
        }
        self.out.flush().map_err(out_err)
    }

    fn dispatch(&mut self, action: Action) -> CliResult<Flow> {
        match action {
            Action::Insert => self.insert_person(),
            Action::AssignParent => self.assign_parent(),
            Action::FindById => self.find_by_id(),
            Action::FindByName => self.find_by_name(),
            Action::Traverse(order) => self.traverse(order),
            Action::Ancestors => self.ancestors(),
            Action::Descendants => self.descendants(),
            Action::FamilyTree => self.family_tree(),
            Action::Exit => {
                output::info(&mut self.out, "Bye").map_err(out_err)?;
                Ok(Flow::Stop)
            }
        }
    }

    fn print_menu(&mut self) -> CliResult<()> {
        output::header(&mut self.out, "Genealogy").map_err(out_err)?;
        for (key, label) in MENU {
            writeln!(self.out, "{:>3}) {}", key, label).map_err(out_err)?;
        }
        Ok(())
    }

    fn label(&self, person: &PersonSummary) -> String {
        person.label(self.settings.show_ids)
    }

    fn insert_person(&mut self) -> CliResult<Flow> {
        let id = loop {
            let Some(id) = self.ask_id("Id:")? else {
                return Ok(Flow::Stop);
            };
            match self.service.check_id(id) {
                Ok(()) => break id,
                Err(e) => output::error(&mut self.out, &e).map_err(out_err)?,
            }
        };
        let Some(name) = self.ask_required("Name:", "name")? else {
            return Ok(Flow::Stop);
        };
        let Some(birth_date) = self.ask_required("Birth date:", "birth date")? else {
            return Ok(Flow::Stop);
        };
        let Some(gender) = self.ask_required("Gender:", "gender")? else {
            return Ok(Flow::Stop);
        };
        let parent_id = self.ask_optional_id("Parent id (blank for none):")?;

        let new = NewPerson {
            id,
            name,
            birth_date,
            gender,
        };
        match self.service.register(new, parent_id) {
            Ok(registration) => {
                let summary = self
                    .service
                    .store()
                    .get(registration.index)
                    .map(PersonSummary::from);
                if let Some(summary) = summary {
                    let label = self.label(&summary);
                    output::success(&mut self.out, &format!("Added {label}")).map_err(out_err)?;
                }
                match registration.parent {
                    ParentLink::None => {}
                    ParentLink::Linked(pid) => {
                        output::detail(&mut self.out, &format!("child of {pid}"))
                            .map_err(out_err)?;
                    }
                    ParentLink::Missing(pid) => {
                        output::warning(
                            &mut self.out,
                            &format!("parent {pid} not found, added without parent"),
                        )
                        .map_err(out_err)?;
                    }
                }
            }
            Err(e) => output::error(&mut self.out, &e).map_err(out_err)?,
        }
        Ok(Flow::Continue)
    }

    fn assign_parent(&mut self) -> CliResult<Flow> {
        let Some(parent) = self.ask_id("Parent id:")? else {
            return Ok(Flow::Stop);
        };
        let Some(child) = self.ask_id("Child id:")? else {
            return Ok(Flow::Stop);
        };
        let written = match self.service.assign_parent(parent, child) {
            Ok(()) => output::success(&mut self.out, &format!("{child} is now a child of {parent}")),
            Err(e) => output::error(&mut self.out, &e),
        };
        written.map_err(out_err)?;
        Ok(Flow::Continue)
    }

    fn find_by_id(&mut self) -> CliResult<Flow> {
        let Some(id) = self.ask_id("Id:")? else {
            return Ok(Flow::Stop);
        };
        let found = self.service.find_by_id(id).cloned();
        match found {
            Some(person) => self.print_person(&person)?,
            None => output::warning(&mut self.out, &format!("no person with id {id}"))
                .map_err(out_err)?,
        }
        Ok(Flow::Continue)
    }

    fn find_by_name(&mut self) -> CliResult<Flow> {
        let Some(name) = self.ask_required("Name:", "name")? else {
            return Ok(Flow::Stop);
        };
        let found = self.service.find_by_name(&name).cloned();
        match found {
            Some(person) => self.print_person(&person)?,
            None => output::warning(&mut self.out, &format!("no person named '{name}'"))
                .map_err(out_err)?,
        }
        Ok(Flow::Continue)
    }

    fn print_person(&mut self, person: &Person) -> CliResult<()> {
        output::header(&mut self.out, person.name()).map_err(out_err)?;
        output::detail(&mut self.out, &format!("id: {}", person.id())).map_err(out_err)?;
        output::detail(&mut self.out, &format!("birth date: {}", person.birth_date()))
            .map_err(out_err)?;
        output::detail(&mut self.out, &format!("gender: {}", person.gender())).map_err(out_err)
    }

    fn traverse(&mut self, order: TraversalOrder) -> CliResult<Flow> {
        let labels: Vec<String> = self
            .service
            .traverse(order)
            .iter()
            .map(|p| self.label(p))
            .collect();
        output::header(&mut self.out, &format!("{order}:")).map_err(out_err)?;
        output::list(&mut self.out, labels, "(empty)").map_err(out_err)?;
        Ok(Flow::Continue)
    }

    fn ancestors(&mut self) -> CliResult<Flow> {
        let Some(id) = self.ask_id("Id:")? else {
            return Ok(Flow::Stop);
        };
        let written = match self.service.ancestors_of(id) {
            Ok(chain) => {
                output::header(&mut self.out, &format!("Ancestors of {id}:")).map_err(out_err)?;
                if chain.is_empty() {
                    output::list(&mut self.out, Vec::<String>::new(), "(none)")
                } else {
                    let line = chain
                        .iter()
                        .map(|p| self.label(p))
                        .join(&self.settings.chain_separator);
                    output::detail(&mut self.out, &line)
                }
            }
            Err(e) => output::error(&mut self.out, &e),
        };
        written.map_err(out_err)?;
        Ok(Flow::Continue)
    }

    fn descendants(&mut self) -> CliResult<Flow> {
        let Some(id) = self.ask_id("Id:")? else {
            return Ok(Flow::Stop);
        };
        let written = match self.service.descendants_of(id) {
            Ok(found) => {
                let labels: Vec<String> = found.iter().map(|p| self.label(p)).collect();
                output::header(&mut self.out, &format!("Descendants of {id}:"))
                    .map_err(out_err)?;
                output::list(&mut self.out, labels, "(none)")
            }
            Err(e) => output::error(&mut self.out, &e),
        };
        written.map_err(out_err)?;
        Ok(Flow::Continue)
    }

    fn family_tree(&mut self) -> CliResult<Flow> {
        let show_ids = self.settings.show_ids;
        let trees = match self.ask_optional_id("Root id (blank for all):")? {
            Some(id) => match self.service.family_tree_of(id, show_ids) {
                Ok(tree) => vec![tree],
                Err(e) => {
                    output::error(&mut self.out, &e).map_err(out_err)?;
                    return Ok(Flow::Continue);
                }
            },
            None => self.service.family_forest(show_ids),
        };
        if trees.is_empty() {
            output::list(&mut self.out, Vec::<String>::new(), "(empty)").map_err(out_err)?;
        }
        for tree in trees {
            write!(self.out, "{tree}").map_err(out_err)?;
        }
        Ok(Flow::Continue)
    }

    /// Prompt and read one line; None once input is exhausted.
    fn ask(&mut self, label: &str) -> CliResult<Option<String>> {
        output::prompt(&mut self.out, label).map_err(out_err)?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| CliError::io("read input", e))?;
        if read == 0 {
            writeln!(self.out).map_err(out_err)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask_id(&mut self, label: &str) -> CliResult<Option<i64>> {
        loop {
            let Some(answer) = self.ask(label)? else {
                return Ok(None);
            };
            match GenealogyService::parse_id(&answer) {
                Ok(id) => return Ok(Some(id)),
                Err(e) => output::error(&mut self.out, &e).map_err(out_err)?,
            }
        }
    }

    /// Blank answer or end of input means no id.
    fn ask_optional_id(&mut self, label: &str) -> CliResult<Option<i64>> {
        loop {
            let Some(answer) = self.ask(label)? else {
                return Ok(None);
            };
            if answer.trim().is_empty() {
                return Ok(None);
            }
            match GenealogyService::parse_id(&answer) {
                Ok(id) => return Ok(Some(id)),
                Err(e) => output::error(&mut self.out, &e).map_err(out_err)?,
            }
        }
    }

    fn ask_required(&mut self, label: &str, field: &'static str) -> CliResult<Option<String>> {
        loop {
            let Some(answer) = self.ask(label)? else {
                return Ok(None);
            };
            let trimmed = answer.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
            output::error(&mut self.out, &DomainError::MissingRequiredField(field))
                .map_err(out_err)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_menu_keys_when_parsing_then_every_entry_maps_to_an_action() {
        for (key, _) in MENU {
            assert!(Action::parse(key).is_some(), "no action for {key}");
        }
        assert_eq!(Action::parse(" 6 "), Some(Action::Traverse(TraversalOrder::Inorder)));
        assert_eq!(Action::parse("11"), None);
    }
}
