// @generated by boxtest from `testdata/box`. Do not edit by hand.
// Regenerate with `boxtest generate`.

const BOXTEST_DECLARED: &[&str] = &[
    "annotatedSamLambda",
    "platformName",
    "reflection/callInstanceJavaMethod",
    "reflection/javaStaticField",
    "statics/fields",
    "statics/functions",
    "statics/inherited/fromJavaClass",
];

#[allow(non_snake_case)]
mod Box {
    use super::*;

    #[test]
    fn testAllFilesPresentInBox() {
        all_files_present("", BOXTEST_DECLARED);
    }

    #[test]
    fn testAnnotatedSamLambda() {
        run_fixture("annotatedSamLambda");
    }

    #[test]
    fn testPlatformName() {
        run_fixture("platformName");
    }

    mod Reflection {
        use super::*;

        #[test]
        fn testAllFilesPresentInReflection() {
            all_files_present("reflection", BOXTEST_DECLARED);
        }

        #[test]
        fn testCallInstanceJavaMethod() {
            run_fixture("reflection/callInstanceJavaMethod");
        }

        #[test]
        fn testJavaStaticField() {
            run_fixture("reflection/javaStaticField");
        }
    }

    mod Statics {
        use super::*;

        #[test]
        fn testAllFilesPresentInStatics() {
            all_files_present("statics", BOXTEST_DECLARED);
        }

        #[test]
        fn testFields() {
            run_fixture("statics/fields");
        }

        #[test]
        fn testFunctions() {
            run_fixture("statics/functions");
        }

        mod Inherited {
            use super::*;

            #[test]
            fn testAllFilesPresentInInherited() {
                all_files_present("statics/inherited", BOXTEST_DECLARED);
            }

            #[test]
            fn testFromJavaClass() {
                run_fixture("statics/inherited/fromJavaClass");
            }
        }
    }
}
