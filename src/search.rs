//! Exhaustive search over the placements of the free variables.
//!
//! Every ordering of the free variables is filled into the template and the
//! resulting program generated. The shortest program wins; on equal length
//! the ordering enumerated first wins, so sequential and parallel runs agree.

use rayon::prelude::*;

use crate::assignment::{Template, VariableMap};
use crate::codegen::generate;
use crate::errors::{CompileError, CompileResult};

/// Search settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Evaluate candidates on the rayon thread pool.
    pub parallel: bool,
    /// Stop after this many candidates. The result is then only the best
    /// found among them, not necessarily the global optimum.
    pub limit: Option<u64>,
    /// Trace every candidate to stderr.
    pub verbose: bool,
}

/// The winning candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub program: String,
    pub map: VariableMap,
    /// Number of candidates evaluated
    pub candidates: u64,
}

/// Lazily yields the permutations of `items` in lexicographic order of
/// their positions in `items`.
pub struct Permutations<T> {
    items: Vec<T>,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl<T: Clone> Permutations<T> {
    pub fn new(items: &[T]) -> Self {
        Permutations {
            items: items.to_vec(),
            indices: (0..items.len()).collect(),
            started: false,
            done: false,
        }
    }

    // Standard next-permutation step on the index vector
    fn advance(&mut self) -> bool {
        let n = self.indices.len();
        let Some(i) = (1..n).rev().find(|&i| self.indices[i - 1] < self.indices[i]) else {
            return false;
        };
        let pivot = i - 1;
        let Some(j) = (i..n).rev().find(|&j| self.indices[j] > self.indices[pivot]) else {
            return false;
        };
        self.indices.swap(pivot, j);
        self.indices[i..].reverse();
        true
    }
}

impl<T: Clone> Iterator for Permutations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.done {
            return None;
        }
        if self.started && !self.advance() {
            self.done = true;
            return None;
        }
        self.started = true;
        Some(self.indices.iter().map(|&i| self.items[i].clone()).collect())
    }
}

/// Number of orderings of `free` variables, if it fits in a `u64`.
pub fn search_space(free: usize) -> Option<u64> {
    (1..=free as u64).try_fold(1u64, |acc, n| acc.checked_mul(n))
}

/// The permutation at position `index` of the lexicographic enumeration.
pub fn nth_permutation<T: Clone>(items: &[T], mut index: u64) -> Vec<T> {
    let mut pool = items.to_vec();
    let mut ordering = Vec::with_capacity(items.len());
    for remaining in (0..items.len()).rev() {
        let block = search_space(remaining).unwrap_or(u64::MAX);
        let pos = (index / block) as usize;
        index %= block;
        ordering.push(pool.remove(pos.min(pool.len() - 1)));
    }
    ordering
}

struct Candidate {
    index: u64,
    length: usize,
    program: String,
    map: VariableMap,
}

fn evaluate(
    source: &str,
    template: &Template,
    ordering: &[char],
    index: u64,
    verbose: bool,
) -> Candidate {
    let map = template.fill(ordering);
    let program = generate(source, &map);
    let length = program.chars().count();
    if verbose {
        let var_array: Vec<char> = map.iter().map(|(symbol, _)| symbol).collect();
        eprintln!("var_array = {:?}; length = {}", var_array, length);
    }
    Candidate {
        index,
        length,
        program,
        map,
    }
}

// Replace only on strictly shorter, so the earliest candidate keeps ties
fn keep_shortest(best: &mut Option<Candidate>, candidate: Candidate) {
    if best.as_ref().map_or(true, |b| candidate.length < b.length) {
        *best = Some(candidate);
    }
}

/// Runs the search and returns the shortest generated program.
pub fn search(
    source: &str,
    template: &Template,
    options: &SearchOptions,
) -> CompileResult<SearchResult> {
    let free = template.free();
    let count = match (search_space(free.len()), options.limit) {
        (Some(total), Some(limit)) => limit.clamp(1, total),
        (Some(total), None) => total,
        (None, Some(limit)) => limit.max(1),
        (None, None) => return Err(CompileError::SearchSpaceTooLarge { free: free.len() }),
    };

    let best = if options.parallel {
        (0..count)
            .into_par_iter()
            .map(|index| {
                let ordering = nth_permutation(free, index);
                evaluate(source, template, &ordering, index, options.verbose)
            })
            .min_by_key(|candidate| (candidate.length, candidate.index))
    } else {
        let mut best = None;
        let take = usize::try_from(count).unwrap_or(usize::MAX);
        for (index, ordering) in (0u64..).zip(Permutations::new(free).take(take)) {
            keep_shortest(&mut best, evaluate(source, template, &ordering, index, options.verbose));
        }
        best
    };

    let best = best.ok_or(CompileError::EmptySearchSpace)?;
    Ok(SearchResult {
        program: best.program,
        map: best.map,
        candidates: count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::program_variables;
    use crate::requirements::{parse_requirements, MappingRequirement};
    use pretty_assertions::assert_eq;

    fn perms(s: &str) -> Vec<String> {
        let items: Vec<char> = s.chars().collect();
        Permutations::new(&items).map(|p| p.into_iter().collect()).collect()
    }

    #[test]
    fn test_permutations_lexicographic() {
        assert_eq!(perms("abc"), vec!["abc", "acb", "bac", "bca", "cab", "cba"]);
    }

    #[test]
    fn test_permutations_of_nothing() {
        assert_eq!(perms(""), vec![""]);
        assert_eq!(perms("x"), vec!["x"]);
    }

    #[test]
    fn test_permutation_count() {
        let items: Vec<u8> = (0..5).collect();
        assert_eq!(Permutations::new(&items).count(), 120);
    }

    #[test]
    fn test_nth_permutation_matches_enumeration() {
        let items: Vec<char> = "abcd".chars().collect();
        for (index, ordering) in Permutations::new(&items).enumerate() {
            assert_eq!(nth_permutation(&items, index as u64), ordering);
        }
    }

    #[test]
    fn test_search_space() {
        assert_eq!(search_space(0), Some(1));
        assert_eq!(search_space(5), Some(120));
        assert_eq!(search_space(20), Some(2_432_902_008_176_640_000));
        assert_eq!(search_space(21), None);
    }

    fn run(source: &str, reqs: &MappingRequirement, options: &SearchOptions) -> SearchResult {
        let template = Template::resolve(&program_variables(source), reqs).unwrap();
        search(source, &template, options).unwrap()
    }

    #[test]
    fn test_picks_shortest() {
        // a and c are used together, b is far from both
        let source = "a+c+a+c+b+";
        let result = run(source, &MappingRequirement::new(), &SearchOptions::default());
        assert_eq!(result.candidates, 6);
        assert_eq!(result.map.iter().map(|(s, _)| s).collect::<String>(), "acb");
        assert_eq!(result.program, "#vbf[{'a': 0, 'c': 1, 'b': 2}]\n+>+<+>+>+");
    }

    #[test]
    fn test_result_is_global_minimum() {
        let source = "ab+c-[d.a,c]b";
        let vars = program_variables(source);
        let template = Template::resolve(&vars, &MappingRequirement::new()).unwrap();
        let result = search(source, &template, &SearchOptions::default()).unwrap();
        let best_len = result.program.chars().count();
        for ordering in Permutations::new(template.free()) {
            let other = generate(source, &template.fill(&ordering));
            assert!(best_len <= other.chars().count());
        }
    }

    #[test]
    fn test_ties_keep_first_ordering() {
        // With c pinned to 0, both orderings of a and b cost six moves
        let reqs = parse_requirements("c:0").unwrap();
        let result = run("c.a.c.b.c.", &reqs, &SearchOptions::default());
        assert_eq!(result.candidates, 2);
        assert_eq!(result.map.get('a'), Some(1));
        assert_eq!(result.map.get('b'), Some(2));
    }

    #[test]
    fn test_parallel_agrees_with_sequential() {
        let source = "ab+c-[d.a,c]be+a-e";
        let reqs = parse_requirements("c:2").unwrap();
        let sequential = run(source, &reqs, &SearchOptions::default());
        let parallel = run(
            source,
            &reqs,
            &SearchOptions {
                parallel: true,
                ..SearchOptions::default()
            },
        );
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_all_constrained_single_candidate() {
        let reqs = parse_requirements("a:1,b:0").unwrap();
        let result = run("a+b+", &reqs, &SearchOptions::default());
        assert_eq!(result.candidates, 1);
        assert_eq!(result.program, "#vbf[{'b': 0, 'a': 1}]\n>+<+");
    }

    #[test]
    fn test_limit_caps_candidates() {
        let options = SearchOptions {
            limit: Some(2),
            ..SearchOptions::default()
        };
        let result = run("a+c+a+c+b+", &MappingRequirement::new(), &options);
        assert_eq!(result.candidates, 2);

        let options = SearchOptions {
            limit: Some(0),
            ..SearchOptions::default()
        };
        assert_eq!(run("ab", &MappingRequirement::new(), &options).candidates, 1);
    }

    #[test]
    fn test_too_many_free_variables() {
        let source: String = ('A'..='Z').collect();
        let template = Template::resolve(&program_variables(&source), &MappingRequirement::new()).unwrap();
        assert_eq!(
            search(&source, &template, &SearchOptions::default()),
            Err(CompileError::SearchSpaceTooLarge { free: 26 })
        );

        for parallel in [false, true] {
            let options = SearchOptions {
                parallel,
                limit: Some(3),
                ..SearchOptions::default()
            };
            let result = search(&source, &template, &options).unwrap();
            assert_eq!(result.candidates, 3);
            assert_eq!(result.map.len(), 26);
        }
    }
}
