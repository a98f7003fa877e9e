use sectioned_core::{
    Attribute, Item, ItemFetch, ModelContext, Predicate, RepoError, SampleService, SectionKey,
    SortDirection, SortField, ATTRIBUTES_PER_ITEM, SAMPLE_ITEMS,
};

fn loaded_service() -> SampleService {
    let mut service = SampleService::new(ModelContext::open_in_memory().unwrap()).unwrap();
    service.load().unwrap();
    service
}

fn ids(service: &SampleService) -> Vec<String> {
    service
        .current_sections()
        .iter()
        .map(|section| section.id.clone())
        .collect()
}

#[test]
fn new_service_starts_with_no_sections() {
    let service = SampleService::new(ModelContext::open_in_memory().unwrap()).unwrap();
    assert!(service.current_sections().is_empty());
    assert!(service.query().predicate().is_none());
}

#[test]
fn load_seeds_sample_items_and_attributes() {
    let service = loaded_service();

    assert_eq!(ids(&service), ["Z", "Y", "X"]);
    let total: usize = service.current_sections().iter().map(|s| s.len()).sum();
    assert_eq!(total, SAMPLE_ITEMS.len() * ATTRIBUTES_PER_ITEM as usize);
    let labels: Vec<String> = service.current_sections()[1]
        .items
        .iter()
        .map(|record| record.label())
        .collect();
    assert_eq!(
        labels,
        [
            "Item[1] 'Y' Attribute[0]",
            "Item[1] 'Y' Attribute[1]",
            "Item[1] 'Y' Attribute[2]",
        ]
    );
}

#[test]
fn load_replaces_previous_data() {
    let mut service = loaded_service();
    service
        .with_context(|context| {
            let extra = Item::new("extra", 9);
            context.insert_item(&extra)?;
            context.insert_attribute(&Attribute::new(&extra, "extra.0", 0))?;
            context.save()
        })
        .unwrap();
    assert_eq!(ids(&service), ["Z", "Y", "X", "extra"]);

    let summary = service.load().unwrap();

    assert_eq!(summary.inserted, 12);
    assert_eq!(ids(&service), ["Z", "Y", "X"]);
    assert_eq!(
        service
            .context()
            .fetch_items(&ItemFetch::default())
            .unwrap()
            .len(),
        3
    );
}

#[test]
fn swap_exchanges_first_two_sections_and_back() {
    let mut service = loaded_service();

    assert!(service.swap().unwrap());
    assert_eq!(ids(&service), ["Y", "Z", "X"]);

    assert!(service.swap().unwrap());
    assert_eq!(ids(&service), ["Z", "Y", "X"]);
}

#[test]
fn swap_with_fewer_than_two_items_is_a_no_op() {
    let mut service = SampleService::new(ModelContext::open_in_memory().unwrap()).unwrap();
    service
        .with_context(|context| {
            context.insert_item(&Item::new("only", 0))?;
            context.save()
        })
        .unwrap();

    assert!(!service.swap().unwrap());
    assert!(!service.context().has_changes());
}

#[test]
fn toggle_item_sort_reverses_sections_but_not_rows() {
    let mut service = loaded_service();

    assert_eq!(service.toggle_item_sort().unwrap(), SortDirection::Reverse);
    assert_eq!(ids(&service), ["X", "Y", "Z"]);
    let orders: Vec<i64> = service.current_sections()[0]
        .items
        .iter()
        .map(|record| record.attribute.order)
        .collect();
    assert_eq!(orders, [0, 1, 2]);
    assert_eq!(service.query().sort()[1].field, SortField::AttributeOrder);

    assert_eq!(service.toggle_item_sort().unwrap(), SortDirection::Forward);
    assert_eq!(ids(&service), ["Z", "Y", "X"]);
}

#[test]
fn toggle_attribute_filter_alternates() {
    let mut service = loaded_service();
    let unfiltered = service.current_sections().to_vec();

    assert!(service.toggle_attribute_filter().unwrap());
    assert!(service.current_sections().iter().all(|s| s.len() == 1));

    assert!(!service.toggle_attribute_filter().unwrap());
    assert_eq!(service.current_sections(), unfiltered.as_slice());
}

#[test]
fn filter_and_sort_toggles_combine_with_swap() {
    let mut service = loaded_service();
    service.toggle_attribute_filter().unwrap();
    service.toggle_item_sort().unwrap();
    service.swap().unwrap();

    assert_eq!(ids(&service), ["X", "Z", "Y"]);
    assert!(service.current_sections().iter().all(|s| s.len() == 1));
}

#[test]
fn setters_rederive_before_returning() {
    let mut service = loaded_service();

    service
        .set_predicate(Some(Predicate::item_name_eq("X")))
        .unwrap();
    assert_eq!(ids(&service), ["X"]);

    service.set_section_key(SectionKey::attribute_name()).unwrap();
    assert_eq!(ids(&service), ["X.0", "X.1", "X.2"]);

    service.set_predicate(None).unwrap();
    assert_eq!(service.current_sections().len(), 9);
}

#[test]
fn failed_context_work_still_refreshes_and_propagates() {
    let mut service = loaded_service();
    let ghost = Item::new("ghost", 0);

    let err = service
        .with_context(|context| {
            let z = context.fetch_items(&ItemFetch::by_order())?.remove(0);
            context.delete_item(z.id)?;
            context.insert_attribute(&Attribute::new(&ghost, "ghost.0", 0))
        })
        .unwrap_err();

    assert!(matches!(err, RepoError::ItemNotFound(id) if id == ghost.id));
    assert_eq!(ids(&service), ["Y", "X"]);
    assert!(service.context().has_changes());
}
