//! Runs functions in sequence under one error policy

use crate::engine::{ErrorPolicy, Flow};
use crate::functions::KrmFunction;
use crate::resource::ResourceList;
use crate::utils::KrmResult;

pub struct Pipeline {
    functions: Vec<Box<dyn KrmFunction>>,
    policy: ErrorPolicy,
}

impl Pipeline {
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            functions: Vec::new(),
            policy,
        }
    }

    pub fn with(mut self, function: Box<dyn KrmFunction>) -> Self {
        self.functions.push(function);
        self
    }

    pub fn push(&mut self, function: Box<dyn KrmFunction>) {
        self.functions.push(function);
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Run every function over `list`, appending admitted results to the
    /// results already on the list. Key derivation and configuration errors
    /// abort the run regardless of policy.
    pub fn run(&self, list: &mut ResourceList) -> KrmResult<()> {
        let mut admitted = Vec::new();

        for function in &self.functions {
            let name = function.name().to_string();
            let _span = tracing::info_span!("function", name = %name).entered();

            let results: Vec<_> = function
                .process(list)?
                .into_iter()
                .map(|r| r.with_tag("function", name.as_str()))
                .collect();
            tracing::debug!(results = results.len(), "function finished");

            if self.policy.admit(&mut admitted, results) == Flow::Halt {
                crate::log_info!("{} reported an error, stopping ({})", name, self.policy);
                break;
            }
        }

        list.results.extend(admitted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::{BanKinds, ValidateMetadataName, ValidateNamespaceName};
    use crate::resource::KubeObject;

    fn messy_list() -> ResourceList {
        ResourceList::new(vec![
            KubeObject::new("v1", "Secret", "creds"),
            KubeObject::new("v1", "ConfigMap", "Bad_Name"),
            KubeObject::new("v1", "ConfigMap", "Also_Bad"),
            KubeObject::new("v1", "Namespace", "-nope"),
        ])
    }

    fn validators(policy: ErrorPolicy) -> Pipeline {
        Pipeline::new(policy)
            .with(Box::new(BanKinds::default()))
            .with(Box::new(ValidateMetadataName))
            .with(Box::new(ValidateNamespaceName))
    }

    #[test]
    fn test_aggregate_all_collects_everything() {
        let mut list = messy_list();
        validators(ErrorPolicy::AggregateAll).run(&mut list).unwrap();

        // one ban result, two bad names, one bad namespace
        assert_eq!(list.error_count(), 4);
        assert_eq!(list.results[0].tags.get("function").map(String::as_str), Some("ban-kinds"));
    }

    #[test]
    fn test_fail_fast_stops_at_first_error() {
        let mut list = messy_list();
        validators(ErrorPolicy::FailFast).run(&mut list).unwrap();
        assert_eq!(list.error_count(), 1);
        assert!(list.results[0].message.contains("banned kinds"));
    }

    #[test]
    fn test_fail_fast_keeps_first_error_of_a_function() {
        let mut list = messy_list();
        Pipeline::new(ErrorPolicy::FailFast)
            .with(Box::new(ValidateMetadataName))
            .run(&mut list)
            .unwrap();
        assert_eq!(list.error_count(), 1);
        assert_eq!(list.results[0].resource_refs[0].name, "Bad_Name");
    }

    #[test]
    fn test_clean_input_has_no_results() {
        let mut list = ResourceList::new(vec![KubeObject::new("v1", "ConfigMap", "fine")]);
        validators(ErrorPolicy::FailFast).run(&mut list).unwrap();
        assert!(list.results.is_empty());
    }

    #[test]
    fn test_existing_results_are_preserved() {
        let mut list = messy_list();
        list.results
            .push(crate::resource::ResultItem::info("from an earlier stage"));
        validators(ErrorPolicy::AggregateAll).run(&mut list).unwrap();
        assert_eq!(list.results[0].message, "from an earlier stage");
    }
}
