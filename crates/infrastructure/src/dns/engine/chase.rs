use ferrous_resolver_domain::{DomainName, RData, Record, RecordType, Resolution};

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Chase {
    /// Records of the wanted type owned by the end of the chain.
    Answer(Resolution),
    /// The chain left this response; ask again for the target.
    Redirect(DomainName),
    /// The name exists but holds nothing of the wanted type.
    NoData(DomainName),
    TooDeep,
}

/// Walks CNAMEs in `answers` starting at `start`.
///
/// `hops` carries across re-queries so a chain split over several responses
/// still counts against `max_depth`.
pub(super) fn follow_aliases(
    answers: &[Record],
    start: &DomainName,
    wanted: RecordType,
    hops: &mut usize,
    max_depth: usize,
) -> Chase {
    let mut owner = start.clone();

    loop {
        let matching: Vec<Record> = answers
            .iter()
            .filter(|r| r.record_type() == wanted && r.name == owner)
            .cloned()
            .collect();
        if !matching.is_empty() {
            return Chase::Answer(Resolution::new(owner, matching));
        }
        if wanted == RecordType::CNAME {
            return Chase::NoData(owner);
        }

        let next = answers.iter().find_map(|r| match &r.data {
            RData::Cname(target) if r.name == owner => Some(target.clone()),
            _ => None,
        });

        match next {
            Some(target) => {
                *hops += 1;
                if *hops > max_depth {
                    return Chase::TooDeep;
                }
                owner = target;
            }
            None if owner == *start => return Chase::NoData(owner),
            None => return Chase::Redirect(owner),
        }
    }
}
