use super::{CodeExample, Difficulty, InterviewQuestion, Module, Phase, Track};

pub(super) fn tracks() -> Vec<Track> {
    vec![java(), kotlin(), spring()]
}

fn code(title: &str, language: &str, code: &str) -> CodeExample {
    CodeExample {
        title: title.to_owned(),
        language: language.to_owned(),
        code: code.trim_start_matches('\n').to_owned(),
    }
}

fn question(difficulty: Difficulty, question: &str, answer: &str) -> InterviewQuestion {
    InterviewQuestion {
        question: question.to_owned(),
        answer: answer.to_owned(),
        difficulty,
    }
}

fn points(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

fn java() -> Track {
    Track {
        id: "java".to_owned(),
        title: "Java".to_owned(),
        description: "The language, the JVM and the standard library, from syntax to concurrency."
            .to_owned(),
        icon: "☕".to_owned(),
        color: "orange".to_owned(),
        phases: vec![
            Phase {
                id: "p0".to_owned(),
                title: "Java Foundations".to_owned(),
                goal: "Write, compile and run small programs with confidence.".to_owned(),
                modules: vec![
                    Module {
                        content: Some(
                            r##"# The JVM and the Toolchain

Java source is compiled to **bytecode**, which the Java Virtual Machine loads,
verifies and executes. The same `.class` files run on every platform with a JVM.

## From Source to Bytecode

`javac` turns `.java` files into `.class` files. The `java` launcher starts a JVM,
loads the main class and calls its `main` method.

```bash
javac -d out src/com/example/Hello.java
java -cp out com.example.Hello
```

### Class Loading

Classes are loaded lazily, the first time they are referenced. Loading happens in
three steps: loading, linking (verification, preparation, resolution) and
initialization.

## JDK, JRE and JVM

| Component | Contains | Used for |
|-----------|----------|----------|
| JVM | execution engine, GC | running bytecode |
| JRE | JVM + class library | running applications |
| JDK | JRE + compiler + tools | developing applications |

## Just-In-Time Compilation

Hot methods are compiled to native code at runtime. The JIT uses profiling data,
so long-running services usually get faster after warm-up.
"##
                            .to_owned(),
                        ),
                        code_examples: vec![code(
                            "Hello, World",
                            "java",
                            r#"
package com.example;

public class Hello {
    public static void main(String[] args) {
        System.out.println("Hello, World");
    }
}
"#,
                        )],
                        key_points: points(&[
                            "javac compiles source to platform-independent bytecode.",
                            "The JVM loads classes lazily and verifies bytecode before running it.",
                            "The JIT compiles hot paths to native code at runtime.",
                        ]),
                        interview_questions: vec![
                            question(
                                Difficulty::Easy,
                                "What is the difference between the JDK and the JRE?",
                                "The JRE runs Java applications; the JDK adds the compiler and development tools.",
                            ),
                            question(
                                Difficulty::Medium,
                                "When is a class initialized?",
                                "On first active use: instantiation, static method call, static field access (non-constant) or reflection.",
                            ),
                        ],
                        ..Module::new("p0-m1", "JVM Basics", "Platform")
                    },
                    Module {
                        content: Some(
                            r##"# Types and Variables

Java is statically typed. Every variable has a type known at compile time.

## Primitive Types

There are eight primitives: `byte`, `short`, `int`, `long`, `float`, `double`,
`char` and `boolean`. They hold values directly and are never `null`.

## Reference Types

Everything else is a reference: classes, interfaces, arrays and enums. A reference
variable holds a pointer to a heap object or `null`.

### Autoboxing

The compiler converts between primitives and their wrappers automatically.
Beware of `NullPointerException` when unboxing a `null` wrapper.

```java
Integer boxed = null;
int value = boxed; // throws NullPointerException
```

## Local Type Inference

Since Java 10, `var` lets the compiler infer the type of a local variable from its
initializer. The variable is still statically typed.
"##
                            .to_owned(),
                        ),
                        key_points: points(&[
                            "Primitives hold values; references point to objects.",
                            "Unboxing a null wrapper throws NullPointerException.",
                            "`var` is inference, not dynamic typing.",
                        ]),
                        interview_questions: vec![question(
                            Difficulty::Easy,
                            "Why does `Integer.valueOf(127) == Integer.valueOf(127)` return true but the same for 128 may not?",
                            "Integer caches boxed values from -128 to 127; outside that range new objects may be created.",
                        )],
                        ..Module::new("p0-m2", "Types and Variables", "Language")
                    },
                    Module {
                        content: Some(
                            r##"# Classes and Objects

A class bundles state (fields) and behaviour (methods).

## Constructors

Constructors initialize new instances. If none is declared, the compiler adds a
no-argument default constructor.

## equals and hashCode

Objects used as map keys must override both `equals` and `hashCode`
consistently: equal objects must have equal hash codes.

## Records

Records are concise immutable data carriers. The compiler generates the
constructor, accessors, `equals`, `hashCode` and `toString`.
"##
                            .to_owned(),
                        ),
                        code_examples: vec![code(
                            "A record",
                            "java",
                            r#"
public record Point(int x, int y) {
    public Point {
        if (x < 0 || y < 0) throw new IllegalArgumentException("negative");
    }
}
"#,
                        )],
                        key_points: points(&[
                            "Override equals and hashCode together.",
                            "Records are transparent, immutable carriers of data.",
                        ]),
                        ..Module::new("p0-m3", "Classes and Objects", "Language")
                    },
                ],
            },
            Phase {
                id: "p1".to_owned(),
                title: "Collections and Generics".to_owned(),
                goal: "Pick the right data structure and write type-safe APIs.".to_owned(),
                modules: vec![
                    Module {
                        content: Some(
                            r##"# The Collections Framework

## Core Interfaces

| Interface | Ordered | Duplicates | Typical implementation |
|-----------|---------|------------|------------------------|
| `List` | yes | yes | `ArrayList` |
| `Set` | no | no | `HashSet` |
| `Map` | no | keys unique | `HashMap` |
| `Deque` | yes | yes | `ArrayDeque` |

## How HashMap Works

Keys are hashed into buckets. Collisions are chained; long chains are converted to
balanced trees. The table is resized when the load factor is exceeded.

### Iteration Order

`HashMap` makes no ordering guarantee. Use `LinkedHashMap` for insertion order
and `TreeMap` for sorted order.
"##
                            .to_owned(),
                        ),
                        key_points: points(&[
                            "Choose the interface first, then the implementation.",
                            "HashMap buckets turn into trees when chains grow long.",
                        ]),
                        interview_questions: vec![question(
                            Difficulty::Hard,
                            "What happens when a HashMap key is mutated after insertion?",
                            "Its hash may change, so lookups search the wrong bucket and the entry becomes unreachable.",
                        )],
                        ..Module::new("p1-m1", "Collections", "Standard Library")
                    },
                    Module {
                        content: Some(
                            r##"# Generics

Generics let a type or method work over other types while keeping compile-time
type safety.

## Type Erasure

Generic type arguments are erased at compile time. At runtime a `List<String>` and
a `List<Integer>` are both just `List`.

## Wildcards

Use `? extends T` when you only read (producer) and `? super T` when you only
write (consumer): *PECS*.

```java
static double sum(Collection<? extends Number> numbers) {
    double total = 0;
    for (Number n : numbers) total += n.doubleValue();
    return total;
}
```
"##
                            .to_owned(),
                        ),
                        key_points: points(&[
                            "Type arguments are erased at runtime.",
                            "Producer extends, consumer super.",
                        ]),
                        interview_questions: vec![question(
                            Difficulty::Hell,
                            "Why can't you create a generic array like `new T[10]`?",
                            "Arrays are reified and check element types at runtime, but T is erased, so the runtime type is unknown.",
                        )],
                        ..Module::new("p1-m2", "Generics", "Language")
                    },
                ],
            },
            Phase {
                id: "p2".to_owned(),
                title: "Concurrency".to_owned(),
                goal: "Reason about threads, visibility and safe publication.".to_owned(),
                modules: vec![
                    Module {
                        content: Some(
                            r##"# Threads and the Memory Model

## Visibility

Without synchronization one thread may never see another thread's writes. The
Java Memory Model defines *happens-before* edges that guarantee visibility.

## volatile

A `volatile` write happens-before every subsequent read of the same field. It does
not make compound actions such as `count++` atomic.

## synchronized

Entering and leaving a monitor creates happens-before edges and gives mutual
exclusion.
"##
                            .to_owned(),
                        ),
                        key_points: points(&[
                            "Visibility needs a happens-before edge.",
                            "volatile gives visibility, not atomicity.",
                        ]),
                        ..Module::new("p2-m1", "Java Memory Model", "Concurrency")
                    },
                    Module {
                        content: Some(
                            r##"# Executors and Virtual Threads

## Thread Pools

`ExecutorService` decouples task submission from execution. Size pools for the
workload: CPU-bound work wants roughly one thread per core.

## Virtual Threads

Java 21 virtual threads are cheap, JVM-managed threads. Blocking a virtual thread
unmounts it from its carrier instead of blocking an OS thread.

```java
try (var executor = Executors.newVirtualThreadPerTaskExecutor()) {
    executor.submit(() -> fetch("https://example.com"));
}
```
"##
                            .to_owned(),
                        ),
                        interview_questions: vec![question(
                            Difficulty::Hard,
                            "What is pinning in the context of virtual threads?",
                            "A virtual thread that blocks inside a synchronized block or native frame cannot unmount and holds its carrier thread.",
                        )],
                        ..Module::new("p2-m2", "Executors", "Concurrency")
                    },
                ],
            },
        ],
    }
}

fn kotlin() -> Track {
    Track {
        id: "kotlin".to_owned(),
        title: "Kotlin".to_owned(),
        description: "Concise, null-safe JVM programming and structured concurrency.".to_owned(),
        icon: "🟣".to_owned(),
        color: "purple".to_owned(),
        phases: vec![
            Phase {
                id: "p3".to_owned(),
                title: "Kotlin Essentials".to_owned(),
                goal: "Read and write idiomatic Kotlin.".to_owned(),
                modules: vec![
                    Module {
                        content: Some(
                            r##"# Null Safety

## Nullable Types

`String` can never hold `null`; `String?` can. The compiler forces you to handle
the nullable case before dereferencing.

## Safe Calls and Elvis

```kotlin
val length = name?.length ?: 0
```

## Platform Types

Values coming from Java have *platform types*: the compiler does not know their
nullability, so the checks are up to you.
"##
                            .to_owned(),
                        ),
                        key_points: points(&[
                            "Nullability is part of the type.",
                            "Java interop introduces platform types.",
                        ]),
                        interview_questions: vec![question(
                            Difficulty::Medium,
                            "What does `!!` do?",
                            "It asserts the value is non-null and throws NullPointerException otherwise.",
                        )],
                        ..Module::new("p3-m1", "Null Safety", "Language")
                    },
                    Module {
                        content: Some(
                            r##"# Data Classes and Sealed Hierarchies

## Data Classes

A `data class` gets `equals`, `hashCode`, `toString`, `copy` and component
functions for its primary constructor properties.

## Sealed Classes

Sealed hierarchies restrict subclasses to the same module, so `when` expressions
over them can be exhaustive without an `else` branch.
"##
                            .to_owned(),
                        ),
                        code_examples: vec![code(
                            "Exhaustive when",
                            "kotlin",
                            r#"
sealed interface Result
data class Ok(val value: Int) : Result
data class Err(val message: String) : Result

fun render(result: Result) = when (result) {
    is Ok -> "ok ${result.value}"
    is Err -> "error ${result.message}"
}
"#,
                        )],
                        ..Module::new("p3-m2", "Data and Sealed Classes", "Language")
                    },
                ],
            },
            Phase {
                id: "p4".to_owned(),
                title: "Coroutines".to_owned(),
                goal: "Write asynchronous code with structured concurrency.".to_owned(),
                modules: vec![
                    Module {
                        content: Some(
                            r##"# Suspending Functions

## suspend

A `suspend` function can pause without blocking its thread. The compiler turns it
into a state machine with a continuation parameter.

## Dispatchers

| Dispatcher | Use for |
|------------|---------|
| `Default` | CPU-bound work |
| `IO` | blocking I/O |
| `Main` | UI updates |
"##
                            .to_owned(),
                        ),
                        key_points: points(&[
                            "Suspension is not blocking.",
                            "Pick the dispatcher for the kind of work.",
                        ]),
                        ..Module::new("p4-m1", "Suspending Functions", "Coroutines")
                    },
                    Module {
                        content: Some(
                            r##"# Structured Concurrency

Every coroutine runs in a scope. A scope does not complete until all of its
children complete, and cancelling a scope cancels its children.

## Cancellation

Cancellation is cooperative: suspending functions from `kotlinx.coroutines` check
for it, tight loops must call `ensureActive()`.
"##
                            .to_owned(),
                        ),
                        interview_questions: vec![question(
                            Difficulty::Hard,
                            "What is the difference between `coroutineScope` and `supervisorScope`?",
                            "In coroutineScope a failing child cancels its siblings and the scope; in supervisorScope children fail independently.",
                        )],
                        ..Module::new("p4-m2", "Structured Concurrency", "Coroutines")
                    },
                ],
            },
        ],
    }
}

fn spring() -> Track {
    Track {
        id: "spring".to_owned(),
        title: "Spring".to_owned(),
        description: "Dependency injection, Spring Boot and building web services.".to_owned(),
        icon: "🌱".to_owned(),
        color: "green".to_owned(),
        phases: vec![
            Phase {
                id: "p5".to_owned(),
                title: "Spring Core".to_owned(),
                goal: "Understand the container before relying on auto-configuration.".to_owned(),
                modules: vec![
                    Module {
                        content: Some(
                            r##"# Inversion of Control

The container creates objects (beans) and wires their dependencies, instead of the
objects constructing what they need.

## Constructor Injection

Prefer constructor injection: dependencies are explicit, fields can be final and
the class is easy to test without the container.

```java
@Service
public class OrderService {
    private final PaymentClient payments;

    public OrderService(PaymentClient payments) {
        this.payments = payments;
    }
}
```

## Bean Scopes

Singleton is the default. Prototype, request and session scopes exist for
special cases.
"##
                            .to_owned(),
                        ),
                        key_points: points(&[
                            "The container owns object creation and wiring.",
                            "Constructor injection keeps dependencies explicit.",
                        ]),
                        ..Module::new("p5-m1", "IoC Container", "Core")
                    },
                    Module {
                        content: Some(
                            r##"# Bean Lifecycle and Proxies

## Lifecycle

Instantiate, populate properties, run `BeanPostProcessor`s, call init callbacks,
and finally destroy callbacks on shutdown.

## AOP Proxies

`@Transactional` and friends work through proxies. A call from one method to
another on the same instance bypasses the proxy, so the annotation has no effect.
"##
                            .to_owned(),
                        ),
                        interview_questions: vec![question(
                            Difficulty::Hell,
                            "Why does a self-invoked `@Transactional` method not start a transaction?",
                            "The call goes through `this`, not the proxy, so the transactional advice never runs.",
                        )],
                        ..Module::new("p5-m2", "Bean Lifecycle", "Core")
                    },
                ],
            },
            Phase {
                id: "p6".to_owned(),
                title: "Spring Boot and Web".to_owned(),
                goal: "Ship a production-ready HTTP service.".to_owned(),
                modules: vec![
                    Module {
                        content: Some(
                            r##"# Auto-Configuration

Spring Boot inspects the classpath and existing beans and registers sensible
defaults through conditional configuration classes.

## Conditions

`@ConditionalOnClass`, `@ConditionalOnMissingBean` and `@ConditionalOnProperty`
decide whether a configuration applies. Your own beans win over the defaults.
"##
                            .to_owned(),
                        ),
                        ..Module::new("p6-m1", "Auto-Configuration", "Boot")
                    },
                    Module {
                        content: Some(
                            r##"# REST Controllers

## Mapping Requests

`@RestController` combines `@Controller` and `@ResponseBody`. Handler methods are
mapped with `@GetMapping`, `@PostMapping` and friends.

## Validation

Annotate request bodies with `@Valid` and constraint annotations; failures become
`400 Bad Request` responses.

## Error Handling

A `@RestControllerAdvice` with `@ExceptionHandler` methods centralizes error
responses.
"##
                            .to_owned(),
                        ),
                        code_examples: vec![code(
                            "A controller",
                            "java",
                            r#"
@RestController
@RequestMapping("/orders")
class OrderController {
    @GetMapping("/{id}")
    Order get(@PathVariable long id) {
        return orders.find(id);
    }
}
"#,
                        )],
                        key_points: points(&[
                            "Keep controllers thin; put logic in services.",
                            "Centralize error mapping in a controller advice.",
                        ]),
                        ..Module::new("p6-m2", "REST Controllers", "Web")
                    },
                ],
            },
        ],
    }
}
